//! The world aggregate: one owner for the grid, the agent and the camera.
//!
//! Front ends (the viewer, the route CLI, tests) drive everything through
//! `GridWorld`; nothing else mutates the grid at runtime.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::Agent;
use crate::config::Config;
use crate::door::{self, reach_distance, InteractOutcome};
use crate::event_log::{EventLog, WorldEvent};
use crate::generate;
use crate::grid::{Grid, Item};
use crate::inventory::{InventoryItem, ItemKind};
use crate::iso::IsoTransform;
use crate::movement::{MoveRequest, Movement, Step};
use crate::pathfinding::{find_path, Position};
use crate::walkability::Walkability;

/// Result of picking up the items on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Number of stacks moved into the backpack
    Collected(usize),
    /// The backpack had no room; everything stayed on the ground
    InventoryFull,
    TooFar,
    /// Nothing lies on that cell
    Nothing,
}

pub struct GridWorld {
    pub grid: Grid,
    pub agent: Agent,
    pub transform: IsoTransform,
    pub config: Config,
    pub log: EventLog,
    tick: u64,
}

impl GridWorld {
    /// Build a world around an existing grid, with the agent at `start`
    pub fn new(grid: Grid, start: Position, config: Config) -> Self {
        let mut agent = Agent::new(start.x, start.y);
        agent.movement = Movement::new(config.movement.revalidate_path);
        for key in &config.map.starting_keys {
            agent.give_key(key.clone());
        }

        let mut transform = config.view.transform();
        transform.center_on(start.x as f64, start.y as f64);

        let mut log = EventLog::new(config.logging.enable_event_log);
        log.record(
            0,
            WorldEvent::MapLoaded {
                size: grid.size(),
                walls: grid.wall_count(),
                doors: grid.door_count(),
            },
        );

        GridWorld {
            grid,
            agent,
            transform,
            config,
            log,
            tick: 0,
        }
    }

    /// Load the configured map (or generate one) and place the agent on the
    /// first walkable cell nearest the map center
    pub fn from_config(config: Config) -> Self {
        let mut rng = match config.map.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = generate::load_or_generate(&config.map.path, config.map.size, &mut rng);
        let start = spawn_point(&grid);
        info!("Agent spawned at ({}, {})", start.x, start.y);
        GridWorld::new(grid, start, config)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    fn notice_ticks(&self) -> u32 {
        self.config
            .interaction
            .notice_ticks(self.config.movement.tick_hz)
    }

    /// Plan a route from the agent's cell to `goal` and start following it.
    ///
    /// While the agent is already moving the request is ignored. An
    /// unreachable goal raises the exclamation notice.
    pub fn request_move(&mut self, goal: Position) -> MoveRequest {
        if self.agent.movement.is_moving() {
            debug!("Ignoring move to ({}, {}): agent busy", goal.x, goal.y);
            return MoveRequest::Busy;
        }

        let start = self.agent.cell();
        let path = find_path(&self.grid, start, goal, self.config.movement.connectivity);
        let cells = path.len();
        let request = self.agent.movement.start(path);

        match request {
            MoveRequest::Started => self.log.record(
                self.tick,
                WorldEvent::MovementStarted {
                    goal_x: goal.x,
                    goal_y: goal.y,
                    cells,
                },
            ),
            MoveRequest::Blocked => {
                info!("No route from ({}, {}) to ({}, {})", start.x, start.y, goal.x, goal.y);
                let ticks = self.notice_ticks();
                self.agent.exclaim(ticks);
                self.log.record(
                    self.tick,
                    WorldEvent::MovementBlocked {
                        goal_x: goal.x,
                        goal_y: goal.y,
                    },
                );
            }
            MoveRequest::Busy => {}
        }
        request
    }

    /// Advance the world by one fixed tick
    pub fn tick(&mut self) -> Step {
        self.tick += 1;

        let step = self
            .agent
            .movement
            .advance(self.config.movement.step_fraction, &self.grid);
        self.agent.apply_step(step);

        match step {
            Step::Arrived(pos) => self.log.record(
                self.tick,
                WorldEvent::MovementFinished { x: pos.x, y: pos.y },
            ),
            Step::Interrupted(pos) => {
                let ticks = self.notice_ticks();
                self.agent.exclaim(ticks);
                self.log.record(
                    self.tick,
                    WorldEvent::MovementInterrupted { x: pos.x, y: pos.y },
                );
            }
            Step::Idle | Step::InProgress | Step::Entered(_) => {}
        }

        let (ax, ay) = self.agent.interpolated_position();
        self.transform.follow(ax, ay, self.config.view.camera_easing);
        self.agent.decay_notices();
        step
    }

    /// Use the door at (x, y) from the agent's current position
    pub fn interact(&mut self, x: i32, y: i32) -> Vec<InteractOutcome> {
        let outcomes = door::interact(
            &mut self.grid,
            x,
            y,
            self.agent.interpolated_position(),
            &self.agent.keys,
            self.config.interaction.reach,
        );

        for &outcome in &outcomes {
            self.log
                .record(self.tick, WorldEvent::DoorInteraction { x, y, outcome });
        }
        // The last outcome is the one worth showing ("Opened" after "Unlocked!")
        if let Some(last) = outcomes.last() {
            if *last != InteractOutcome::NotADoor {
                let ticks = self.notice_ticks();
                self.agent.say(last.message(), ticks);
            }
        }
        outcomes
    }

    /// Move the items lying on (x, y) into the backpack
    pub fn collect_items(&mut self, x: i32, y: i32) -> CollectOutcome {
        if self.grid.items_at(x, y).is_empty() {
            return CollectOutcome::Nothing;
        }
        if reach_distance(self.agent.interpolated_position(), x, y) > self.config.interaction.reach {
            return CollectOutcome::TooFar;
        }

        let mut collected = 0;
        let mut left = Vec::new();
        for item in self.grid.take_items(x, y) {
            let stack = InventoryItem::from(&item);
            if self.agent.inventory.add(stack) {
                if let Some(key) = key_name(&item) {
                    self.agent.give_key(item.kind.clone());
                    self.agent.give_key(key);
                }
                collected += 1;
            } else {
                left.push(item);
            }
        }
        for item in left {
            self.grid.add_item(x, y, item);
        }

        let ticks = self.notice_ticks();
        if collected == 0 {
            self.agent.say("Inventory full", ticks);
            return CollectOutcome::InventoryFull;
        }

        info!("Collected {} stack(s) at ({}, {})", collected, x, y);
        self.agent.say("Collected", ticks);
        self.log.record(
            self.tick,
            WorldEvent::ItemsCollected {
                x,
                y,
                stacks: collected,
            },
        );
        CollectOutcome::Collected(collected)
    }

    /// Take `count` of `name` out of the backpack and leave it on (x, y).
    /// Returns false when the cell is out of reach, blocked, or the backpack
    /// holds fewer than `count`.
    pub fn drop_item(&mut self, x: i32, y: i32, name: &str, count: u32) -> bool {
        if count == 0 || !self.grid.can_walk_through(x, y) {
            return false;
        }
        if reach_distance(self.agent.interpolated_position(), x, y) > self.config.interaction.reach {
            return false;
        }
        let Some(kind) = self
            .agent
            .inventory
            .backpack()
            .iter()
            .find(|stack| stack.name == name)
            .map(|stack| stack.kind)
        else {
            return false;
        };
        if !self.agent.inventory.remove(name, kind, count) {
            return false;
        }

        self.grid.add_item(x, y, Item::new(name, count));
        self.log.record(
            self.tick,
            WorldEvent::ItemDropped {
                x,
                y,
                name: name.to_string(),
                count,
            },
        );
        true
    }

    /// Cell under a screen point, if it lies on the map
    pub fn cell_at_screen(&self, screen_x: f64, screen_y: f64) -> Option<Position> {
        let (x, y) = self.transform.screen_to_cell(screen_x, screen_y);
        self.grid.in_bounds(x, y).then(|| Position::new(x, y))
    }

    /// Move towards the cell under a screen point
    pub fn click(&mut self, screen_x: f64, screen_y: f64) -> Option<MoveRequest> {
        let goal = self.cell_at_screen(screen_x, screen_y)?;
        Some(self.request_move(goal))
    }

    /// Turn the agent to face a screen point (mouse hover)
    pub fn face(&mut self, screen_x: f64, screen_y: f64) {
        self.agent.angle = self.transform.facing_angle(screen_x, screen_y);
    }
}

/// Keys found on the ground unlock doors by their id with or without the
/// `key_` prefix
fn key_name(item: &Item) -> Option<String> {
    if ItemKind::classify(&item.kind) != ItemKind::Key {
        return None;
    }
    Some(
        item.kind
            .strip_prefix("key_")
            .unwrap_or(&item.kind)
            .to_string(),
    )
}

/// Walkable cell closest to the map center, scanning outward ring by ring
fn spawn_point(grid: &Grid) -> Position {
    let center = grid.size() / 2;
    for radius in 0..=center + 1 {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let (x, y) = (center + dx, center + dy);
                if grid.can_walk_through(x, y) {
                    return Position::new(x, y);
                }
            }
        }
    }
    Position::new(center, center)
}
