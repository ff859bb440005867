//! Map files as produced by the level generators.
//!
//! Every layer is an N x N array indexed `[x][y]`. Individual cells that fail
//! to parse degrade to a sentinel (-1 for ids, `NONE` for wall types) instead
//! of rejecting the whole file.

use crate::error::{GridError, GridResult};
use crate::grid::{Grid, Item, WallProperties, WallType, MAX_GRID_SIZE};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

type Layer = Vec<Vec<Value>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapFile {
    #[serde(default)]
    map_size: Option<i64>,
    #[serde(default)]
    floor_map: Option<Layer>,
    #[serde(default)]
    wall_map: Option<Layer>,
    #[serde(default)]
    ceiling_map: Option<Layer>,
    #[serde(default)]
    wall_types: Option<Layer>,
    #[serde(default)]
    wall_properties: Option<Layer>,
    #[serde(default)]
    item_map: Option<Layer>,
}

/// A map read from disk
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub grid: Grid,
    /// False when the file carried no `wallProperties` layer; door locks and
    /// wall health still need initializing in that case
    pub has_wall_properties: bool,
}

/// Integer cell value, -1 for anything unparseable
fn parse_id(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(-1),
        Value::String(s) => s.trim().parse().unwrap_or(-1),
        _ => -1,
    }
}

fn parse_wall_type(value: &Value) -> WallType {
    value
        .as_str()
        .and_then(WallType::from_name)
        .unwrap_or_default()
}

fn parse_wall_props(value: &Value) -> WallProperties {
    let mut props = WallProperties::default();
    let Some(obj) = value.as_object() else {
        return props;
    };
    if let Some(open) = obj.get("isOpen").and_then(Value::as_bool) {
        props.is_open = open;
    }
    if let Some(locked) = obj.get("isLocked").and_then(Value::as_bool) {
        props.is_locked = locked;
    }
    props.key_id = obj
        .get("keyId")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(health) = obj.get("health").and_then(Value::as_i64) {
        props.health = health.clamp(0, 255) as u8;
    }
    props
}

fn parse_items(value: &Value) -> Vec<Item> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<Item>(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Visit every (x, y, value) of a layer that falls inside the grid
fn for_each_cell(layer: &Layer, size: i32, mut f: impl FnMut(i32, i32, &Value)) {
    for (x, column) in layer.iter().enumerate().take(size as usize) {
        for (y, value) in column.iter().enumerate().take(size as usize) {
            f(x as i32, y as i32, value);
        }
    }
}

impl MapFile {
    fn size(&self) -> GridResult<i32> {
        let size = match (self.map_size, &self.floor_map) {
            (Some(size), _) => size,
            (None, Some(floor)) => floor.len() as i64,
            (None, None) => return Err(GridError::MissingField("mapSize")),
        };
        if size <= 0 || size > MAX_GRID_SIZE as i64 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(size as i32)
    }

    fn into_map(self) -> GridResult<LoadedMap> {
        let size = self.size()?;
        let floor = self.floor_map.as_ref().ok_or(GridError::MissingField("floorMap"))?;
        let walls = self.wall_map.as_ref().ok_or(GridError::MissingField("wallMap"))?;
        let types = self.wall_types.as_ref().ok_or(GridError::MissingField("wallTypes"))?;

        let mut grid = Grid::new(size);
        for_each_cell(floor, size, |x, y, v| grid.set_floor(x, y, parse_id(v)));
        for_each_cell(walls, size, |x, y, v| {
            if let Some(cell) = grid.cell_mut(x, y) {
                cell.wall_id = parse_id(v);
            }
        });
        for_each_cell(types, size, |x, y, v| {
            if let Some(cell) = grid.cell_mut(x, y) {
                cell.wall_type = parse_wall_type(v);
            }
        });
        if let Some(ceiling) = &self.ceiling_map {
            for_each_cell(ceiling, size, |x, y, v| grid.set_ceiling(x, y, parse_id(v)));
        } else {
            debug!("ceilingMap absent, leaving ceilings empty");
        }
        if let Some(props) = &self.wall_properties {
            for_each_cell(props, size, |x, y, v| {
                if let Some(cell) = grid.cell_mut(x, y) {
                    cell.wall_props = parse_wall_props(v);
                }
            });
        }
        if let Some(items) = &self.item_map {
            for_each_cell(items, size, |x, y, v| {
                if let Some(cell) = grid.cell_mut(x, y) {
                    cell.items = parse_items(v);
                }
            });
        }

        // A cell without a wall occupant cannot carry a wall type
        for y in 0..size {
            for x in 0..size {
                if let Some(cell) = grid.cell_mut(x, y) {
                    if !cell.has_wall() {
                        cell.wall_type = WallType::None;
                    }
                }
            }
        }

        info!(
            "Map loaded: {}x{}, {} walls, {} doors",
            size,
            size,
            grid.wall_count(),
            grid.door_count()
        );
        Ok(LoadedMap {
            grid,
            has_wall_properties: self.wall_properties.is_some(),
        })
    }
}

/// Parse map JSON text
pub fn parse_map(json: &str) -> GridResult<LoadedMap> {
    let file: MapFile = serde_json::from_str(json)?;
    file.into_map()
}

/// Load a map file from disk
pub fn load_map(path: impl AsRef<Path>) -> GridResult<LoadedMap> {
    let json = fs::read_to_string(path)?;
    parse_map(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walkability::Walkability;

    const SMALL_MAP: &str = r#"{
        "mapSize": 3,
        "floorMap": [[1, 2, 3], [4, "x", 6], [7, 8, 9]],
        "wallMap": [[-1, 5, -1], [-1, 2, -1], [-1, -1, 4]],
        "ceilingMap": [[-1, -1, -1], [-1, 0, -1], [-1, -1, -1]],
        "wallTypes": [["NONE", "DOOR", "DOOR"], ["NONE", "BOGUS", "NONE"], ["NONE", "NONE", "DESTRUCTIBLE"]],
        "wallProperties": [
            [{}, {"isOpen": false, "isLocked": true, "keyId": "k1", "health": 255}, {}],
            [{}, {}, {}],
            [{}, {}, {"isOpen": false, "isLocked": false, "keyId": null, "health": 900}]
        ],
        "itemMap": [[[], [], [{"type": "treasure", "count": 2}]], [[], [], []], [[], [], []]]
    }"#;

    #[test]
    fn layers_are_indexed_x_then_y() {
        let map = parse_map(SMALL_MAP).unwrap();
        let grid = &map.grid;
        assert_eq!(grid.cell(0, 2).unwrap().floor_id, 3);
        assert_eq!(grid.cell(2, 0).unwrap().floor_id, 7);
        assert_eq!(grid.cell(0, 1).unwrap().wall_type, WallType::Door);
        assert!(map.has_wall_properties);
    }

    #[test]
    fn bad_tokens_degrade_to_sentinels() {
        let map = parse_map(SMALL_MAP).unwrap();
        let grid = &map.grid;
        assert_eq!(grid.cell(1, 1).unwrap().floor_id, -1);
        // Wall id 2 with an unknown type token becomes NONE
        assert_eq!(grid.cell(1, 1).unwrap().wall_type, WallType::None);
        // DOOR type without a wall occupant is forced to NONE
        assert_eq!(grid.cell(0, 2).unwrap().wall_type, WallType::None);
    }

    #[test]
    fn wall_properties_are_read_and_clamped() {
        let map = parse_map(SMALL_MAP).unwrap();
        let grid = &map.grid;
        let door = grid.wall_props(0, 1).unwrap();
        assert!(door.is_locked);
        assert_eq!(door.key_id.as_deref(), Some("k1"));
        assert!(!grid.can_walk_through(0, 1));
        assert_eq!(grid.wall_props(2, 2).unwrap().health, 255);
    }

    #[test]
    fn items_are_loaded() {
        let map = parse_map(SMALL_MAP).unwrap();
        assert_eq!(map.grid.items_at(0, 2), &[Item::new("treasure", 2)]);
    }

    #[test]
    fn optional_layers_may_be_absent() {
        let json = r#"{"floorMap": [[0, 0], [0, 0]], "wallMap": [[-1, 1], [-1, -1]],
                       "wallTypes": [["NONE", "INDESTRUCTIBLE"], ["NONE", "NONE"]]}"#;
        let map = parse_map(json).unwrap();
        assert_eq!(map.grid.size(), 2);
        assert!(!map.has_wall_properties);
        assert!(!map.grid.can_walk_through(0, 1));
        assert_eq!(map.grid.cell(1, 1).unwrap().ceiling_id, -1);
    }

    #[test]
    fn missing_required_layer_is_an_error() {
        let json = r#"{"mapSize": 2, "floorMap": [[0, 0], [0, 0]], "wallTypes": []}"#;
        assert!(matches!(parse_map(json), Err(GridError::MissingField("wallMap"))));
        assert!(matches!(parse_map("not json"), Err(GridError::Json(_))));
        assert!(matches!(parse_map("{}"), Err(GridError::MissingField("mapSize"))));
    }

    #[test]
    fn oversized_map_is_rejected() {
        let json = r#"{"mapSize": 50000, "floorMap": [[0]], "wallMap": [[-1]], "wallTypes": [["NONE"]]}"#;
        assert!(matches!(parse_map(json), Err(GridError::InvalidSize(50000))));
        let json = r#"{"mapSize": -3, "floorMap": [[0]], "wallMap": [[-1]], "wallTypes": [["NONE"]]}"#;
        assert!(matches!(parse_map(json), Err(GridError::InvalidSize(-3))));
    }
}
