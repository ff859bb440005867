use crate::grid::{Grid, WallProperties, WallType};

/// Anything that can answer "may an agent enter (x, y) right now?"
///
/// The pathfinder and movement controller only depend on this trait, so tests
/// and alternative map representations can plug in their own rules.
pub trait Walkability {
    fn can_walk_through(&self, x: i32, y: i32) -> bool;
}

/// Walkability of a single wall occupant.
///
/// Doors follow their live `is_open` flag. Destructible walls block regardless
/// of remaining health.
pub fn is_passable(wall_type: WallType, props: &WallProperties) -> bool {
    match wall_type {
        WallType::Door => props.is_open,
        WallType::None | WallType::Traversable | WallType::Transparent => true,
        WallType::Destructible | WallType::Indestructible => false,
    }
}

impl Walkability for Grid {
    fn can_walk_through(&self, x: i32, y: i32) -> bool {
        // Out of bounds is never walkable
        self.cell(x, y)
            .map(|cell| is_passable(cell.wall_type, &cell.wall_props))
            .unwrap_or(false)
    }
}
