//! Procedural fallback maps and wall-state initialization.

use crate::grid::{Grid, Item, WallType};
use log::{info, warn};
use rand::Rng;
use std::path::Path;

/// Chance that a generated door starts locked
pub const LOCKED_DOOR_CHANCE: f64 = 0.2;

/// Key id that unlocks the door at (x, y) on a map of the given size
pub fn door_key_id(x: i32, y: i32, size: i32) -> String {
    format!("key_{}", x * size + y)
}

/// Random floors, ~10% walls of any non-NONE type, ~5% ceilings, ~3% treasure
pub fn generate_default<R: Rng + ?Sized>(size: i32, rng: &mut R) -> Grid {
    let mut grid = Grid::new(size);
    let size = grid.size();
    for x in 0..size {
        for y in 0..size {
            grid.set_floor(x, y, rng.gen_range(0..50));

            if rng.gen_bool(0.1) {
                let wall_type = WallType::ALL[rng.gen_range(1..WallType::ALL.len())];
                grid.set_wall(x, y, rng.gen_range(0..50), wall_type);
            }
            if rng.gen_bool(0.05) {
                grid.set_ceiling(x, y, rng.gen_range(0..30));
            }
            if rng.gen_bool(0.03) {
                grid.add_item(x, y, Item::new("treasure", rng.gen_range(1..=3)));
            }
        }
    }
    init_wall_properties(&mut grid, rng);

    info!(
        "Generated default map: {}x{}, {} walls, {} doors",
        size,
        size,
        grid.wall_count(),
        grid.door_count()
    );
    grid
}

/// Close every door, lock ~20% of them behind a per-door key, and give
/// destructible walls 100..=255 health
pub fn init_wall_properties<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let size = grid.size();
    for x in 0..size {
        for y in 0..size {
            let Some(wall_type) = grid.wall_type(x, y) else {
                continue;
            };
            match wall_type {
                WallType::Door => {
                    let locked = rng.gen_bool(LOCKED_DOOR_CHANCE);
                    if let Some(props) = grid.wall_props_mut(x, y) {
                        props.is_open = false;
                        if locked {
                            props.is_locked = true;
                            props.key_id = Some(door_key_id(x, y, size));
                        }
                    }
                }
                WallType::Destructible => {
                    let health = rng.gen_range(100..=255u8);
                    if let Some(props) = grid.wall_props_mut(x, y) {
                        props.health = health;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Load the map at `path`, falling back to a generated `fallback_size` map when
/// the file is missing or malformed
pub fn load_or_generate<R: Rng + ?Sized>(path: impl AsRef<Path>, fallback_size: i32, rng: &mut R) -> Grid {
    let path = path.as_ref();
    match crate::map_file::load_map(path) {
        Ok(mut map) => {
            if !map.has_wall_properties {
                init_wall_properties(&mut map.grid, rng);
            }
            map.grid
        }
        Err(e) => {
            warn!(
                "Could not load map {}: {}; generating a default map",
                path.display(),
                e
            );
            generate_default(fallback_size, rng)
        }
    }
}
