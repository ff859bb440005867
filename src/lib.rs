pub mod agent;
pub mod config;
pub mod door;
pub mod error;
pub mod event_log;
pub mod generate;
pub mod grid;
pub mod inventory;
pub mod iso;
pub mod map_file;
pub mod movement;
pub mod pathfinding;
pub mod save_state;
pub mod walkability;
pub mod world;

pub use agent::Agent;
pub use config::Config;
pub use door::{interact, DoorState, InteractOutcome};
pub use error::{GridError, GridResult};
pub use grid::{Cell, Grid, Item, WallProperties, WallType};
pub use iso::IsoTransform;
pub use movement::{MoveRequest, Movement, Step};
pub use pathfinding::{find_path, Connectivity, Position};
pub use walkability::Walkability;
pub use world::{CollectOutcome, GridWorld};
