use crate::grid::{Grid, WallProperties, WallType};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default interaction reach, in cells (Chebyshev), with slack for
/// fractional agent positions
pub const DEFAULT_REACH: f64 = 1.5;

/// Observable state of a door cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    ClosedLocked,
    ClosedUnlocked,
    Open,
}

impl DoorState {
    pub fn of(props: &WallProperties) -> DoorState {
        if props.is_open {
            DoorState::Open
        } else if props.is_locked {
            DoorState::ClosedLocked
        } else {
            DoorState::ClosedUnlocked
        }
    }
}

/// What happened during an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractOutcome {
    Opened,
    Closed,
    NeedsKey,
    Unlocked,
    NotADoor,
    TooFar,
}

impl InteractOutcome {
    /// Short text shown above the agent
    pub fn message(self) -> &'static str {
        match self {
            InteractOutcome::Opened => "Opened",
            InteractOutcome::Closed => "Closed",
            InteractOutcome::NeedsKey => "Need Key",
            InteractOutcome::Unlocked => "Unlocked!",
            InteractOutcome::NotADoor => "Nothing to open",
            InteractOutcome::TooFar => "Too far",
        }
    }
}

/// Chebyshev distance between a fractional agent position and a cell
pub fn reach_distance(agent: (f64, f64), x: i32, y: i32) -> f64 {
    (x as f64 - agent.0).abs().max((y as f64 - agent.1).abs())
}

/// Door state at (x, y), or `None` when the cell holds no door
pub fn door_state(grid: &Grid, x: i32, y: i32) -> Option<DoorState> {
    let cell = grid.cell(x, y)?;
    if cell.wall_type != WallType::Door || !cell.has_wall() {
        return None;
    }
    Some(DoorState::of(&cell.wall_props))
}

/// Use the door at (x, y).
///
/// Outcomes are returned in the order they happened: a successful interaction
/// with a locked door yields `[Unlocked, Opened]`. Refusals (`NotADoor`,
/// `TooFar`, `NeedsKey`) leave the grid untouched.
pub fn interact(
    grid: &mut Grid,
    x: i32,
    y: i32,
    agent: (f64, f64),
    keys: &HashSet<String>,
    reach: f64,
) -> Vec<InteractOutcome> {
    if door_state(grid, x, y).is_none() {
        return vec![InteractOutcome::NotADoor];
    }
    if reach_distance(agent, x, y) > reach {
        return vec![InteractOutcome::TooFar];
    }

    let needs_unlock = match grid.wall_props(x, y) {
        Some(props) if props.is_locked => match &props.key_id {
            Some(key) if keys.contains(key) => true,
            // A locked door without a key id can never be opened
            _ => return vec![InteractOutcome::NeedsKey],
        },
        _ => false,
    };

    let mut outcomes = Vec::with_capacity(2);
    let Some(props) = grid.wall_props_mut(x, y) else {
        return vec![InteractOutcome::NotADoor];
    };
    if needs_unlock {
        props.is_locked = false;
        outcomes.push(InteractOutcome::Unlocked);
    }
    props.is_open = !props.is_open;
    let is_open = props.is_open;
    outcomes.push(if is_open {
        InteractOutcome::Opened
    } else {
        InteractOutcome::Closed
    });

    info!(
        "Door at ({}, {}) {}",
        x,
        y,
        if is_open { "opened" } else { "closed" }
    );
    outcomes
}
