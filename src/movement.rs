use crate::pathfinding::Position;
use crate::walkability::Walkability;
use log::{debug, info};

/// Progress added per tick by default: 20 ticks per tile
pub const DEFAULT_STEP_FRACTION: f64 = 0.05;

// Tolerance when comparing accumulated progress against 1.0
const PROGRESS_EPSILON: f64 = 1e-9;

/// Result of asking the controller to follow a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    Started,
    /// The path was empty: no route to the requested cell
    Blocked,
    /// Already moving; the request was ignored
    Busy,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    /// Still between two cells
    InProgress,
    /// Reached the next cell of the path
    Entered(Position),
    /// Reached the final cell; the controller is idle again
    Arrived(Position),
    /// The next cell became unwalkable; stopped on the current one
    Interrupted(Position),
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    Moving {
        path: Vec<Position>,
        /// Index of the cell the agent is leaving
        index: usize,
        /// Fraction of the current segment covered, in [0, 1)
        progress: f64,
    },
}

/// Drives an agent along a precomputed path in fixed-fraction ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    state: State,
    /// Check walkability of each cell before entering it
    pub revalidate: bool,
}

impl Default for Movement {
    fn default() -> Self {
        Movement::new(false)
    }
}

impl Movement {
    pub fn new(revalidate: bool) -> Self {
        Movement {
            state: State::Idle,
            revalidate,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, State::Moving { .. })
    }

    /// Begin following `path` (start cell first).
    ///
    /// Requests made while already moving are ignored; the current path is
    /// followed until arrival.
    pub fn start(&mut self, path: Vec<Position>) -> MoveRequest {
        if self.is_moving() {
            debug!("Movement request ignored: already moving");
            return MoveRequest::Busy;
        }
        if path.is_empty() {
            return MoveRequest::Blocked;
        }
        if let Some(goal) = path.last() {
            info!("Movement started towards ({}, {})", goal.x, goal.y);
        }
        self.state = State::Moving {
            path,
            index: 0,
            progress: 0.0,
        };
        MoveRequest::Started
    }

    /// Abandon the current path, leaving the agent on `current_cell`
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Advance by `fraction` of a tile. `world` is consulted only when
    /// re-validation is enabled.
    pub fn advance<W: Walkability + ?Sized>(&mut self, fraction: f64, world: &W) -> Step {
        let revalidate = self.revalidate;
        let State::Moving {
            path,
            index,
            progress,
        } = &mut self.state
        else {
            return Step::Idle;
        };

        // Single-cell path: already there
        if *index + 1 >= path.len() {
            let goal = path[path.len() - 1];
            self.state = State::Idle;
            info!("Movement finished at ({}, {})", goal.x, goal.y);
            return Step::Arrived(goal);
        }

        if revalidate && *progress == 0.0 {
            let next = path[*index + 1];
            if !world.can_walk_through(next.x, next.y) {
                let here = path[*index];
                debug!(
                    "Path blocked at ({}, {}); stopping at ({}, {})",
                    next.x, next.y, here.x, here.y
                );
                self.state = State::Idle;
                return Step::Interrupted(here);
            }
        }

        *progress += fraction;
        if *progress + PROGRESS_EPSILON < 1.0 {
            return Step::InProgress;
        }

        *progress = 0.0;
        *index += 1;
        let reached = path[*index];
        if *index + 1 >= path.len() {
            self.state = State::Idle;
            info!("Movement finished at ({}, {})", reached.x, reached.y);
            return Step::Arrived(reached);
        }
        Step::Entered(reached)
    }

    /// Cell the agent last fully occupied along the path
    pub fn current_cell(&self) -> Option<Position> {
        match &self.state {
            State::Moving { path, index, .. } => path.get(*index).copied(),
            State::Idle => None,
        }
    }

    /// Remaining path including the cell currently being left
    pub fn remaining_path(&self) -> &[Position] {
        match &self.state {
            State::Moving { path, index, .. } => &path[*index..],
            State::Idle => &[],
        }
    }

    pub fn goal(&self) -> Option<Position> {
        match &self.state {
            State::Moving { path, .. } => path.last().copied(),
            State::Idle => None,
        }
    }

    /// Linear blend between the current cell and the next one
    pub fn interpolated_position(&self) -> Option<(f64, f64)> {
        match &self.state {
            State::Moving {
                path,
                index,
                progress,
            } => {
                let from = path.get(*index)?;
                let to = path.get(*index + 1).unwrap_or(from);
                Some((
                    from.x as f64 + (to.x - from.x) as f64 * progress,
                    from.y as f64 + (to.y - from.y) as f64 * progress,
                ))
            }
            State::Idle => None,
        }
    }
}
