//! Print the A* route between two cells of a map file
//!
//! Usage: route <map.json> <start_x> <start_y> <goal_x> <goal_y> [--four-way]

use isogrid::map_file::load_map;
use isogrid::pathfinding::{find_path, format_path, path_cost};
use isogrid::{Config, Connectivity, Position};
use std::env;
use std::process;

fn parse_coord(args: &[String], index: usize) -> Result<i32, Box<dyn std::error::Error>> {
    let raw = args
        .get(index)
        .ok_or_else(|| format!("missing argument {}", index))?;
    raw.parse::<i32>()
        .map_err(|e| format!("bad coordinate '{}': {}", raw, e).into())
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let map_path = args.get(1).ok_or("missing map path")?;
    let start = Position::new(parse_coord(args, 2)?, parse_coord(args, 3)?);
    let goal = Position::new(parse_coord(args, 4)?, parse_coord(args, 5)?);

    let connectivity = if args.iter().any(|a| a == "--four-way") {
        Connectivity::FourWay
    } else {
        Config::load().movement.connectivity
    };

    let map = load_map(map_path)?;
    let path = find_path(&map.grid, start, goal, connectivity);

    if path.is_empty() {
        println!("No route from ({}, {}) to ({}, {})", start.x, start.y, goal.x, goal.y);
        process::exit(2);
    }

    println!("{}", format_path(&path));
    println!("Cells: {}  Cost: {:.3}", path.len(), path_cost(&path));
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 6 {
        eprintln!("Usage: {} <map.json> <start_x> <start_y> <goal_x> <goal_y> [--four-way]", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
