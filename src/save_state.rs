use serde::{Deserialize, Serialize};
use std::fs;

use crate::agent::Agent;
use crate::error::{GridError, GridResult};
use crate::grid::{Grid, WallType};
use crate::inventory::Inventory;

/// Save state containing the mutable part of a map plus the agent.
/// Static layers (floors, wall ids, ceilings) come from the map file.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    /// Grid revision number
    pub grid_revision: u64,
    pub grid_size: i32,
    pub doors: Vec<DoorSaveData>,
    /// Destructible walls as (x, y, health); destroyed walls are absent
    pub destructibles: Vec<(i32, i32, u8)>,
    pub agent: AgentSaveData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoorSaveData {
    pub x: i32,
    pub y: i32,
    pub is_open: bool,
    pub is_locked: bool,
}

/// Agent data for saving/loading (no movement state)
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentSaveData {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub keys: Vec<String>,
    pub inventory: Inventory,
}

impl SaveState {
    /// Create a save state from current grid and agent
    pub fn capture(grid: &Grid, agent: &Agent) -> Self {
        let mut doors = Vec::new();
        let mut destructibles = Vec::new();
        for ((x, y), cell) in grid.iter() {
            match cell.wall_type {
                WallType::Door => doors.push(DoorSaveData {
                    x,
                    y,
                    is_open: cell.wall_props.is_open,
                    is_locked: cell.wall_props.is_locked,
                }),
                WallType::Destructible => destructibles.push((x, y, cell.wall_props.health)),
                _ => {}
            }
        }

        let mut keys: Vec<String> = agent.keys.iter().cloned().collect();
        keys.sort();

        // Mid-step positions are saved as the cell being left
        let position = agent
            .movement
            .current_cell()
            .map(|p| (p.x as f64, p.y as f64))
            .unwrap_or(agent.position);

        SaveState {
            grid_revision: grid.revision(),
            grid_size: grid.size(),
            doors,
            destructibles,
            agent: AgentSaveData {
                x: position.0,
                y: position.1,
                angle: agent.angle,
                keys,
                inventory: agent.inventory.clone(),
            },
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> GridResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> GridResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Restore door and wall state onto `grid` (loaded from the same map) and
    /// replace the agent's position, keys and inventory
    pub fn restore(&self, grid: &mut Grid, agent: &mut Agent) -> GridResult<()> {
        if grid.size() != self.grid_size {
            return Err(GridError::InvalidSize(self.grid_size as i64));
        }

        for door in &self.doors {
            if grid.wall_type(door.x, door.y) != Some(WallType::Door) {
                continue;
            }
            if let Some(props) = grid.wall_props_mut(door.x, door.y) {
                props.is_open = door.is_open;
                props.is_locked = door.is_locked;
            }
        }

        // Destructible walls missing from the save were destroyed
        let size = grid.size();
        for x in 0..size {
            for y in 0..size {
                if grid.wall_type(x, y) != Some(WallType::Destructible) {
                    continue;
                }
                match self.destructibles.iter().find(|(dx, dy, _)| *dx == x && *dy == y) {
                    Some(&(_, _, health)) => {
                        if let Some(props) = grid.wall_props_mut(x, y) {
                            props.health = health;
                        }
                    }
                    None => grid.set_wall(x, y, -1, WallType::None),
                }
            }
        }

        agent.movement.cancel();
        agent.position = (self.agent.x, self.agent.y);
        agent.angle = self.agent.angle;
        agent.keys = self.agent.keys.iter().cloned().collect();
        agent.inventory = self.agent.inventory.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walkability::Walkability;

    #[test]
    fn door_and_wall_state_survive_restore() {
        let mut grid = Grid::new(6);
        grid.set_wall(1, 1, 3, WallType::Door);
        grid.set_wall(2, 2, 4, WallType::Destructible);
        grid.set_wall(3, 3, 4, WallType::Destructible);
        grid.wall_props_mut(1, 1).unwrap().is_open = true;
        grid.wall_props_mut(2, 2).unwrap().health = 70;
        grid.damage_wall(3, 3, 255);

        let mut agent = Agent::new(4, 4);
        agent.give_key("key_7");
        let state = SaveState::capture(&grid, &agent);

        let mut fresh = Grid::new(6);
        fresh.set_wall(1, 1, 3, WallType::Door);
        fresh.set_wall(2, 2, 4, WallType::Destructible);
        fresh.set_wall(3, 3, 4, WallType::Destructible);
        let mut fresh_agent = Agent::new(0, 0);
        state.restore(&mut fresh, &mut fresh_agent).unwrap();

        assert!(fresh.can_walk_through(1, 1));
        assert_eq!(fresh.wall_props(2, 2).unwrap().health, 70);
        assert_eq!(fresh.wall_type(3, 3), Some(WallType::None));
        assert_eq!(fresh_agent.position, (4.0, 4.0));
        assert!(fresh_agent.has_key("key_7"));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let grid = Grid::new(4);
        let agent = Agent::new(0, 0);
        let state = SaveState::capture(&grid, &agent);
        let mut other = Grid::new(5);
        let mut other_agent = Agent::new(0, 0);
        assert!(state.restore(&mut other, &mut other_agent).is_err());
    }
}
