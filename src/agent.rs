use crate::inventory::Inventory;
use crate::movement::{Movement, Step};
use crate::pathfinding::Position;
use std::collections::HashSet;

/// Text or indicator shown above the agent for a limited number of ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub ticks_left: u32,
}

/// The movable player entity
#[derive(Debug, Clone)]
pub struct Agent {
    /// Grid position; fractional only while snapping mid-path
    pub position: (f64, f64),
    /// Facing angle in radians
    pub angle: f64,
    pub keys: HashSet<String>,
    pub inventory: Inventory,
    pub movement: Movement,
    /// Message above the agent ("Opened", "Need Key", ...)
    pub message: Option<Notice>,
    /// "No route" exclamation indicator
    pub exclamation: Option<Notice>,
}

impl Agent {
    pub fn new(x: i32, y: i32) -> Self {
        Agent {
            position: (x as f64, y as f64),
            angle: 0.0,
            keys: HashSet::new(),
            inventory: Inventory::new(),
            movement: Movement::default(),
            message: None,
            exclamation: None,
        }
    }

    /// Cell the agent stands on (floor of its position)
    pub fn cell(&self) -> Position {
        Position::new(
            self.position.0.floor() as i32,
            self.position.1.floor() as i32,
        )
    }

    /// Position for rendering and distance checks, blended while moving
    pub fn interpolated_position(&self) -> (f64, f64) {
        self.movement
            .interpolated_position()
            .unwrap_or(self.position)
    }

    pub fn give_key(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Apply a movement step to the discrete position
    pub fn apply_step(&mut self, step: Step) {
        match step {
            Step::Entered(pos) | Step::Arrived(pos) | Step::Interrupted(pos) => {
                self.position = (pos.x as f64, pos.y as f64);
            }
            Step::Idle | Step::InProgress => {}
        }
    }

    pub fn say(&mut self, text: impl Into<String>, ticks: u32) {
        self.message = Some(Notice {
            text: text.into(),
            ticks_left: ticks,
        });
    }

    pub fn exclaim(&mut self, ticks: u32) {
        self.exclamation = Some(Notice {
            text: "!".to_string(),
            ticks_left: ticks,
        });
    }

    /// Count notices down by one tick, dropping expired ones
    pub fn decay_notices(&mut self) {
        for slot in [&mut self.message, &mut self.exclamation] {
            let expired = match slot.as_mut() {
                Some(notice) => {
                    notice.ticks_left = notice.ticks_left.saturating_sub(1);
                    notice.ticks_left == 0
                }
                None => false,
            };
            if expired {
                *slot = None;
            }
        }
    }
}
