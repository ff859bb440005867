#![allow(dead_code)]

use isogrid::pathfinding::{format_path, path_cost, DIAGONAL_COST};
use isogrid::{Connectivity, Grid, Position, WallType, Walkability};
use rand::Rng;

/// A grid parsed from a text layout, with optional start and goal markers
pub struct Layout {
    pub grid: Grid,
    pub start: Option<Position>,
    pub goal: Option<Position>,
}

/// Parse a text layout, one row per line (row index = y, column = x)
/// Format:
/// - ■: indestructible wall
/// - □ or .: free cell
/// - D: closed door, d: open door
/// - s: start, g: goal (both free)
///
/// The grid is square; cells outside a non-square layout are walls.
pub fn parse_layout(text: &str) -> Layout {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let height = lines.len() as i32;
    let width = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let size = width.max(height);

    let mut grid = Grid::new(size);
    for y in 0..size {
        for x in 0..size {
            if x >= width || y >= height {
                grid.set_wall(x, y, 0, WallType::Indestructible);
            }
        }
    }

    let mut start = None;
    let mut goal = None;
    for (y, line) in lines.iter().enumerate() {
        let y = y as i32;
        let mut len = 0;
        for (x, ch) in line.chars().enumerate() {
            let x = x as i32;
            len += 1;
            match ch {
                '■' => grid.set_wall(x, y, 0, WallType::Indestructible),
                'D' => grid.set_wall(x, y, 1, WallType::Door),
                'd' => {
                    grid.set_wall(x, y, 1, WallType::Door);
                    grid.wall_props_mut(x, y).unwrap().is_open = true;
                }
                's' => start = Some(Position::new(x, y)),
                'g' => goal = Some(Position::new(x, y)),
                '□' | '.' | ' ' => {}
                other => panic!("unknown layout character {:?}", other),
            }
        }
        // Short rows are padded with walls
        for x in len..size {
            grid.set_wall(x, y, 0, WallType::Indestructible);
        }
    }

    Layout { grid, start, goal }
}

/// Mirror a layout left-right and/or top-bottom
pub fn flip_layout(text: &str, horizontal: bool, vertical: bool) -> String {
    let mut lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if horizontal {
                line.chars().rev().collect()
            } else {
                line.to_string()
            }
        })
        .collect();
    if vertical {
        lines.reverse();
    }
    lines.join("\n")
}

/// Random square grid with roughly `density` of the cells walled
pub fn random_grid<R: Rng>(size: i32, density: f64, rng: &mut R) -> Grid {
    let mut grid = Grid::new(size);
    for x in 0..size {
        for y in 0..size {
            if rng.gen_bool(density) {
                grid.set_wall(x, y, 0, WallType::Indestructible);
            }
        }
    }
    grid
}

fn step_options(connectivity: Connectivity) -> Vec<(i32, i32, f64)> {
    let mut steps = vec![(1, 0, 1.0), (-1, 0, 1.0), (0, 1, 1.0), (0, -1, 1.0)];
    if connectivity == Connectivity::EightWay {
        for (dx, dy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            steps.push((dx, dy, DIAGONAL_COST));
        }
    }
    steps
}

/// Reference shortest-path cost by exhaustive Dijkstra (O(n^2) selection,
/// no heap), using the same movement rules as the pathfinder
pub fn dijkstra_cost(
    grid: &Grid,
    start: Position,
    goal: Position,
    connectivity: Connectivity,
) -> Option<f64> {
    if !grid.can_walk_through(goal.x, goal.y) || !grid.in_bounds(start.x, start.y) {
        return None;
    }
    let size = grid.size();
    let index = |p: Position| (p.x + p.y * size) as usize;
    let count = (size * size) as usize;

    let mut dist = vec![f64::INFINITY; count];
    let mut done = vec![false; count];
    dist[index(start)] = 0.0;

    loop {
        let mut best: Option<usize> = None;
        for i in 0..count {
            if !done[i] && dist[i].is_finite() && best.map_or(true, |b| dist[i] < dist[b]) {
                best = Some(i);
            }
        }
        let Some(current) = best else {
            return None;
        };
        let pos = Position::new(current as i32 % size, current as i32 / size);
        if pos == goal {
            return Some(dist[current]);
        }
        done[current] = true;

        for (dx, dy, cost) in step_options(connectivity) {
            let next = Position::new(pos.x + dx, pos.y + dy);
            if !grid.can_walk_through(next.x, next.y) {
                continue;
            }
            if dx != 0
                && dy != 0
                && !(grid.can_walk_through(pos.x + dx, pos.y) && grid.can_walk_through(pos.x, pos.y + dy))
            {
                continue;
            }
            let candidate = dist[current] + cost;
            if candidate < dist[index(next)] {
                dist[index(next)] = candidate;
            }
        }
    }
}

/// Check the structural path invariants: starts at `start`, ends at `goal`,
/// adjacent steps, walkable cells, no corner cutting
pub fn assert_valid_path(grid: &Grid, path: &[Position], start: Position, goal: Position, connectivity: Connectivity) {
    assert_eq!(path.first(), Some(&start), "path must begin at start");
    assert_eq!(path.last(), Some(&goal), "path must end at goal");
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0), "non-adjacent step {:?} -> {:?}", a, b);
        assert!(grid.can_walk_through(b.x, b.y), "path enters blocked cell {:?}", b);
        if dx != 0 && dy != 0 {
            assert_eq!(connectivity, Connectivity::EightWay, "diagonal step in 4-way path");
            assert!(
                grid.can_walk_through(a.x + dx, a.y) && grid.can_walk_through(a.x, a.y + dy),
                "corner cut between {:?} and {:?}",
                a,
                b
            );
        }
    }
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, path: &[Position]) -> String {
    let mut result = String::new();

    result.push_str(&format!("\nPath: {}\n", format_path(path)));
    result.push_str(&format!(
        "Length: {} steps, Cost: {:.2}\n\n",
        path.len().saturating_sub(1),
        path_cost(path)
    ));

    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let pos = Position::new(x, y);
            let symbol = if path.first() == Some(&pos) {
                'S'
            } else if path.last() == Some(&pos) {
                'G'
            } else if path.contains(&pos) {
                '*'
            } else if !grid.can_walk_through(x, y) {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}
