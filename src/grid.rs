use serde::{Deserialize, Serialize};

/// Behavioral category of a cell's wall occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WallType {
    #[default]
    None,
    Traversable,
    Transparent,
    Door,
    Destructible,
    Indestructible,
}

impl WallType {
    pub const ALL: [WallType; 6] = [
        WallType::None,
        WallType::Traversable,
        WallType::Transparent,
        WallType::Door,
        WallType::Destructible,
        WallType::Indestructible,
    ];

    /// Parse a map-file token such as `"DOOR"`. Surrounding quotes and
    /// whitespace are ignored; anything unrecognised yields `None`.
    pub fn from_name(name: &str) -> Option<WallType> {
        let name = name.trim().trim_matches('"');
        WallType::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            WallType::None => "NONE",
            WallType::Traversable => "TRAVERSABLE",
            WallType::Transparent => "TRANSPARENT",
            WallType::Door => "DOOR",
            WallType::Destructible => "DESTRUCTIBLE",
            WallType::Indestructible => "INDESTRUCTIBLE",
        }
    }
}

fn full_health() -> u8 {
    255
}

/// Mutable runtime state of a wall.
///
/// `is_open`, `is_locked` and `key_id` only matter for doors; `health` only
/// matters for destructible walls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallProperties {
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default = "full_health")]
    pub health: u8,
}

impl Default for WallProperties {
    fn default() -> Self {
        WallProperties {
            is_open: false,
            is_locked: false,
            key_id: None,
            health: full_health(),
        }
    }
}

/// A stack of items lying on the ground
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

impl Item {
    pub fn new(kind: impl Into<String>, count: u32) -> Self {
        Item {
            kind: kind.into(),
            count,
        }
    }
}

/// One addressable location of the map
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub floor_id: i32,
    /// -1 means the cell has no wall occupant
    pub wall_id: i32,
    /// -1 means no ceiling
    pub ceiling_id: i32,
    pub wall_type: WallType,
    pub wall_props: WallProperties,
    pub items: Vec<Item>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            floor_id: 0,
            wall_id: -1,
            ceiling_id: -1,
            wall_type: WallType::None,
            wall_props: WallProperties::default(),
            items: Vec::new(),
        }
    }
}

impl Cell {
    pub fn has_wall(&self) -> bool {
        self.wall_id != -1
    }
}

/// Square tile map storing floor, wall and ceiling layers plus wall state
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
    /// Revision number - incremented whenever wall state or items change
    revision: u64,
}

/// Largest side length a grid may have
pub const MAX_GRID_SIZE: i32 = 1024;

impl Grid {
    /// Create a new `size` x `size` grid with bare floor everywhere.
    /// `size` is clamped to `0..=MAX_GRID_SIZE`.
    pub fn new(size: i32) -> Self {
        let size = size.clamp(0, MAX_GRID_SIZE);
        let count = size as usize * size as usize;
        Grid {
            size,
            cells: vec![Cell::default(); count],
            revision: 0,
        }
    }

    /// Create a grid with indestructible walls on the given cells
    pub fn with_walls(size: i32, walls: &[(i32, i32)]) -> Self {
        let mut grid = Self::new(size);
        for &(x, y) in walls {
            grid.set_wall(x, y, 0, WallType::Indestructible);
        }
        grid
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.size
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.get(self.get_id(x, y) as usize)
    }

    /// Mutable access to a cell. Counts as a modification of the grid.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let id = self.get_id(x, y) as usize;
        self.revision += 1;
        self.cells.get_mut(id)
    }

    /// Iterate over all cells with their coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(id, cell)| ((id as i32 % size, id as i32 / size), cell))
    }

    pub fn set_floor(&mut self, x: i32, y: i32, floor_id: i32) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.floor_id = floor_id;
        }
    }

    pub fn set_ceiling(&mut self, x: i32, y: i32, ceiling_id: i32) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.ceiling_id = ceiling_id;
        }
    }

    /// Place (or remove, with `wall_id == -1`) a wall occupant.
    ///
    /// Wall properties are reset. A cell without a wall always gets
    /// `WallType::None`.
    pub fn set_wall(&mut self, x: i32, y: i32, wall_id: i32, wall_type: WallType) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.wall_id = wall_id;
            cell.wall_type = if wall_id == -1 {
                WallType::None
            } else {
                wall_type
            };
            cell.wall_props = WallProperties::default();
        }
    }

    /// Wall type at (x, y); `None` outside the grid
    pub fn wall_type(&self, x: i32, y: i32) -> Option<WallType> {
        self.cell(x, y).map(|c| c.wall_type)
    }

    pub fn wall_props(&self, x: i32, y: i32) -> Option<&WallProperties> {
        self.cell(x, y).map(|c| &c.wall_props)
    }

    pub fn wall_props_mut(&mut self, x: i32, y: i32) -> Option<&mut WallProperties> {
        self.cell_mut(x, y).map(|c| &mut c.wall_props)
    }

    /// Ground items at (x, y); empty outside the grid
    pub fn items_at(&self, x: i32, y: i32) -> &[Item] {
        self.cell(x, y).map(|c| c.items.as_slice()).unwrap_or(&[])
    }

    pub fn add_item(&mut self, x: i32, y: i32, item: Item) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.items.push(item);
        }
    }

    /// Remove and return every item lying on (x, y)
    pub fn take_items(&mut self, x: i32, y: i32) -> Vec<Item> {
        match self.cell_mut(x, y) {
            Some(cell) => std::mem::take(&mut cell.items),
            None => Vec::new(),
        }
    }

    /// Damage a destructible wall. Returns the remaining health, or `None` if
    /// (x, y) holds no destructible wall. A wall reduced to 0 is removed.
    pub fn damage_wall(&mut self, x: i32, y: i32, amount: u8) -> Option<u8> {
        if self.wall_type(x, y) != Some(WallType::Destructible) {
            return None;
        }
        let cell = self.cell_mut(x, y)?;
        let health = cell.wall_props.health.saturating_sub(amount);
        cell.wall_props.health = health;
        if health == 0 {
            cell.wall_id = -1;
            cell.wall_type = WallType::None;
            cell.wall_props = WallProperties::default();
        }
        Some(health)
    }

    /// Number of cells holding a wall occupant
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_wall()).count()
    }

    pub fn door_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.wall_type == WallType::Door)
            .count()
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Render the wall layout as text, one row per line:
    /// `■` blocking wall, `D` closed door, `d` open door, `□` free, `s` marker
    pub fn layout_string(&self, marker: Option<(i32, i32)>) -> String {
        let mut result = String::new();
        for y in 0..self.size {
            for x in 0..self.size {
                let symbol = match self.cell(x, y) {
                    _ if marker == Some((x, y)) => 's',
                    Some(cell) => match cell.wall_type {
                        WallType::Door if cell.wall_props.is_open => 'd',
                        WallType::Door => 'D',
                        WallType::Destructible | WallType::Indestructible => '■',
                        _ => '□',
                    },
                    None => '□',
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_fully_initialized() {
        let grid = Grid::new(30);
        assert_eq!(grid.size(), 30);
        assert_eq!(grid.iter().count(), 900);
        for (_, cell) in grid.iter() {
            assert_eq!(cell.wall_id, -1);
            assert_eq!(cell.ceiling_id, -1);
            assert_eq!(cell.wall_type, WallType::None);
        }
    }

    #[test]
    fn ids_are_row_major() {
        let grid = Grid::new(50);
        assert_eq!(grid.get_id(3, 2), 103);
        assert_eq!(grid.iter().nth(103).map(|(pos, _)| pos), Some((3, 2)));
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(Grid::new(-4).size(), 0);
        assert_eq!(Grid::new(i32::MAX).size(), MAX_GRID_SIZE);
        assert_eq!(Grid::new(0).iter().count(), 0);
    }

    #[test]
    fn removing_wall_forces_none_type() {
        let mut grid = Grid::new(5);
        grid.set_wall(1, 1, -1, WallType::Door);
        assert_eq!(grid.wall_type(1, 1), Some(WallType::None));
    }

    #[test]
    fn out_of_bounds_queries_are_safe() {
        let mut grid = Grid::new(5);
        assert!(grid.cell(-1, 0).is_none());
        assert!(grid.wall_type(5, 5).is_none());
        assert!(grid.items_at(9, 9).is_empty());
        assert!(grid.take_items(-3, 2).is_empty());
        grid.set_wall(7, 7, 1, WallType::Indestructible);
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn wall_type_names_parse() {
        assert_eq!(WallType::from_name("DOOR"), Some(WallType::Door));
        assert_eq!(WallType::from_name(" \"TRANSPARENT\" "), Some(WallType::Transparent));
        assert_eq!(WallType::from_name("door"), None);
    }

    #[test]
    fn destroyed_wall_is_cleared() {
        let mut grid = Grid::new(5);
        grid.set_wall(2, 2, 4, WallType::Destructible);
        grid.wall_props_mut(2, 2).unwrap().health = 60;
        assert_eq!(grid.damage_wall(2, 2, 50), Some(10));
        assert_eq!(grid.wall_type(2, 2), Some(WallType::Destructible));
        assert_eq!(grid.damage_wall(2, 2, 50), Some(0));
        assert_eq!(grid.wall_type(2, 2), Some(WallType::None));
        assert_eq!(grid.cell(2, 2).unwrap().wall_id, -1);
        assert_eq!(grid.damage_wall(2, 2, 1), None);
    }

    #[test]
    fn mutations_bump_revision() {
        let mut grid = Grid::new(5);
        let before = grid.revision();
        grid.add_item(0, 0, Item::new("treasure", 2));
        assert!(grid.revision() > before);
        assert_eq!(grid.take_items(0, 0), vec![Item::new("treasure", 2)]);
    }

    #[test]
    fn layout_string_marks_walls_and_doors() {
        let mut grid = Grid::with_walls(3, &[(0, 0)]);
        grid.set_wall(2, 0, 1, WallType::Door);
        let text = grid.layout_string(Some((1, 1)));
        assert_eq!(text, "■□D\n□s□\n□□□\n");
    }
}
