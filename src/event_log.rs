use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::door::InteractOutcome;
use crate::error::GridResult;

/// Things that happen in the world, recorded for later inspection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    MapLoaded { size: i32, walls: usize, doors: usize },
    MovementStarted { goal_x: i32, goal_y: i32, cells: usize },
    /// A move request found no route
    MovementBlocked { goal_x: i32, goal_y: i32 },
    MovementFinished { x: i32, y: i32 },
    MovementInterrupted { x: i32, y: i32 },
    DoorInteraction { x: i32, y: i32, outcome: InteractOutcome },
    ItemsCollected { x: i32, y: i32, stacks: usize },
    ItemDropped { x: i32, y: i32, name: String, count: u32 },
}

/// Logged event with timestamp and the tick it happened on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub tick: u64,
    pub event: WorldEvent,
}

/// Event recorder
pub struct EventLog {
    start_time: Instant,
    enabled: bool,
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new(enabled: bool) -> Self {
        EventLog {
            start_time: Instant::now(),
            enabled,
            events: Vec::new(),
        }
    }

    /// Record an event with the current timestamp
    pub fn record(&mut self, tick: u64, event: WorldEvent) {
        if !self.enabled {
            return;
        }
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent {
            timestamp_ms,
            tick,
            event,
        });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> GridResult<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut moves = 0;
        let mut blocked = 0;
        let mut interrupted = 0;
        let mut doors_opened = 0;
        let mut doors_closed = 0;
        let mut refusals = 0;
        let mut pickups = 0;

        for logged in &self.events {
            match &logged.event {
                WorldEvent::MovementFinished { .. } => moves += 1,
                WorldEvent::MovementBlocked { .. } => blocked += 1,
                WorldEvent::MovementInterrupted { .. } => interrupted += 1,
                WorldEvent::DoorInteraction { outcome, .. } => match outcome {
                    InteractOutcome::Opened => doors_opened += 1,
                    InteractOutcome::Closed => doors_closed += 1,
                    InteractOutcome::Unlocked => {}
                    _ => refusals += 1,
                },
                WorldEvent::ItemsCollected { .. } => pickups += 1,
                _ => {}
            }
        }

        let last_tick = self.events.last().map(|e| e.tick).unwrap_or(0);

        format!(
            "Ticks: {}\n\
             Total Events: {}\n\
             Movement: {} finished, {} blocked, {} interrupted\n\
             Doors: {} opened, {} closed, {} refused\n\
             Pickups: {}",
            last_tick,
            self.events.len(),
            moves,
            blocked,
            interrupted,
            doors_opened,
            doors_closed,
            refusals,
            pickups
        )
    }
}

impl Default for EventLog {
    fn default() -> Self {
        EventLog::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_records_nothing() {
        let mut log = EventLog::new(false);
        log.record(1, WorldEvent::MovementFinished { x: 0, y: 0 });
        assert!(log.events().is_empty());
    }

    #[test]
    fn summary_counts_events() {
        let mut log = EventLog::new(true);
        log.record(3, WorldEvent::MovementBlocked { goal_x: 1, goal_y: 1 });
        log.record(
            9,
            WorldEvent::DoorInteraction {
                x: 2,
                y: 2,
                outcome: InteractOutcome::Opened,
            },
        );
        log.record(
            12,
            WorldEvent::DoorInteraction {
                x: 2,
                y: 2,
                outcome: InteractOutcome::NeedsKey,
            },
        );
        let summary = log.summary();
        assert!(summary.contains("Ticks: 12"));
        assert!(summary.contains("0 finished, 1 blocked"));
        assert!(summary.contains("1 opened, 0 closed, 1 refused"));
    }

    #[test]
    fn events_serialize_to_json() {
        let mut log = EventLog::new(true);
        log.record(0, WorldEvent::MapLoaded { size: 50, walls: 3, doors: 1 });
        let json = serde_json::to_string(log.events()).unwrap();
        assert!(json.contains("MapLoaded"));
    }
}
