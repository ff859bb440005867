use crate::walkability::Walkability;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Cost of a diagonal step
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// A position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Chebyshev distance (king moves)
    pub fn chebyshev(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// Neighbour generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// N, S, E, W; Manhattan heuristic
    FourWay,
    /// Adds diagonals (no corner cutting); Chebyshev heuristic
    #[default]
    EightWay,
}

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

impl Connectivity {
    pub fn heuristic(self, from: Position, to: Position) -> f64 {
        match self {
            Connectivity::FourWay => from.manhattan(&to) as f64,
            Connectivity::EightWay => from.chebyshev(&to) as f64,
        }
    }

    /// Walkable neighbours of `pos` together with the step cost
    fn neighbors<W: Walkability + ?Sized>(self, world: &W, pos: Position) -> Vec<(Position, f64)> {
        let mut result = Vec::with_capacity(8);
        for (dx, dy) in ORTHOGONAL {
            let next = Position::new(pos.x + dx, pos.y + dy);
            if world.can_walk_through(next.x, next.y) {
                result.push((next, 1.0));
            }
        }
        if self == Connectivity::EightWay {
            for (dx, dy) in DIAGONAL {
                let next = Position::new(pos.x + dx, pos.y + dy);
                if !world.can_walk_through(next.x, next.y) {
                    continue;
                }
                // Both sides of the corner must be open
                if world.can_walk_through(pos.x + dx, pos.y)
                    && world.can_walk_through(pos.x, pos.y + dy)
                {
                    result.push((next, DIAGONAL_COST));
                }
            }
        }
        result
    }
}

/// A node in the open set
#[derive(Debug, Clone)]
struct PathNode {
    position: Position,
    g: f64,
    h: f64,
}

impl PathNode {
    fn f(&self) -> f64 {
        self.g + self.h
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f()
            .partial_cmp(&self.f())
            .unwrap_or(Ordering::Equal)
            // Prefer nodes closer to the goal, then position for deterministic ordering
            .then_with(|| other.h.partial_cmp(&self.h).unwrap_or(Ordering::Equal))
            .then_with(|| other.position.x.cmp(&self.position.x))
            .then_with(|| other.position.y.cmp(&self.position.y))
    }
}

/// A* search from `start` to `goal`.
///
/// Returns the route including both endpoints, or an empty vector when the
/// goal cannot be reached. The start cell itself does not need to be walkable.
pub fn find_path<W: Walkability + ?Sized>(
    world: &W,
    start: Position,
    goal: Position,
    connectivity: Connectivity,
) -> Vec<Position> {
    trace!(
        "[find_path] ({},{}) -> ({},{}), {:?}",
        start.x,
        start.y,
        goal.x,
        goal.y,
        connectivity
    );

    if start == goal {
        return vec![start];
    }
    if !world.can_walk_through(goal.x, goal.y) {
        debug!("[find_path] goal ({},{}) is not walkable", goal.x, goal.y);
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut closed_set: HashSet<Position> = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut best_g: HashMap<Position, f64> = HashMap::new();

    best_g.insert(start, 0.0);
    open_set.push(PathNode {
        position: start,
        g: 0.0,
        h: connectivity.heuristic(start, goal),
    });

    let mut expanded = 0usize;
    while let Some(current) = open_set.pop() {
        if !closed_set.insert(current.position) {
            continue;
        }
        expanded += 1;

        if current.position == goal {
            let path = reconstruct_path(&came_from, goal);
            debug!(
                "[find_path] found {} cells, cost {:.3}, {} nodes expanded",
                path.len(),
                current.g,
                expanded
            );
            return path;
        }

        for (next, step_cost) in connectivity.neighbors(world, current.position) {
            if closed_set.contains(&next) {
                continue;
            }
            let tentative_g = current.g + step_cost;
            let improves = best_g
                .get(&next)
                .map_or(true, |&known| tentative_g < known);
            if improves {
                best_g.insert(next, tentative_g);
                came_from.insert(next, current.position);
                open_set.push(PathNode {
                    position: next,
                    g: tentative_g,
                    h: connectivity.heuristic(next, goal),
                });
            }
        }
    }

    debug!(
        "[find_path] no path ({},{}) -> ({},{}) after {} nodes",
        start.x, start.y, goal.x, goal.y, expanded
    );
    Vec::new()
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total step cost of a path (1 per orthogonal step, sqrt(2) per diagonal)
pub fn path_cost(path: &[Position]) -> f64 {
    path.windows(2)
        .map(|pair| {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            if dx != 0 && dy != 0 {
                DIAGONAL_COST
            } else {
                1.0
            }
        })
        .sum()
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|pos| format!("({},{})", pos.x, pos.y))
        .collect::<Vec<_>>()
        .join(" -> ")
}
