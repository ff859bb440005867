mod common;

use common::{parse_layout, Layout};
use isogrid::door::{door_state, interact, DEFAULT_REACH};
use isogrid::pathfinding::find_path;
use isogrid::{Config, Connectivity, DoorState, Grid, GridWorld, InteractOutcome, MoveRequest, Position, WallType, Walkability};
use std::collections::HashSet;

fn locked_door_world() -> GridWorld {
    let mut grid = Grid::new(10);
    grid.set_wall(5, 5, 7, WallType::Door);
    {
        let props = grid.wall_props_mut(5, 5).unwrap();
        props.is_locked = true;
        props.key_id = Some("k1".to_string());
    }
    let mut config = Config::default();
    config.map.starting_keys.clear();
    GridWorld::new(grid, Position::new(4, 5), config)
}

#[test]
fn test_door_lifecycle() {
    let mut grid = Grid::new(6);
    grid.set_wall(2, 2, 1, WallType::Door);
    let keys = HashSet::new();

    assert_eq!(door_state(&grid, 2, 2), Some(DoorState::ClosedUnlocked));
    assert!(!grid.can_walk_through(2, 2));

    for round in 0..3 {
        assert_eq!(interact(&mut grid, 2, 2, (1.0, 2.0), &keys, DEFAULT_REACH), vec![InteractOutcome::Opened]);
        assert!(grid.can_walk_through(2, 2), "round {}", round);
        assert_eq!(interact(&mut grid, 2, 2, (1.0, 2.0), &keys, DEFAULT_REACH), vec![InteractOutcome::Closed]);
        assert!(!grid.can_walk_through(2, 2), "round {}", round);
    }
}

#[test]
fn test_locked_door_needs_its_key() {
    let mut world = locked_door_world();

    assert_eq!(world.interact(5, 5), vec![InteractOutcome::NeedsKey]);
    assert_eq!(world.agent.message.as_ref().unwrap().text, "Need Key");
    assert!(!world.grid.can_walk_through(5, 5));
    assert_eq!(door_state(&world.grid, 5, 5), Some(DoorState::ClosedLocked));

    world.agent.give_key("k1");
    assert_eq!(world.interact(5, 5), vec![InteractOutcome::Unlocked, InteractOutcome::Opened]);
    assert!(world.grid.can_walk_through(5, 5));

    // Closing keeps it unlocked; reopening needs no key
    world.agent.keys.clear();
    assert_eq!(world.interact(5, 5), vec![InteractOutcome::Closed]);
    assert_eq!(door_state(&world.grid, 5, 5), Some(DoorState::ClosedUnlocked));
    assert_eq!(world.interact(5, 5), vec![InteractOutcome::Opened]);
}

#[test]
fn test_opening_a_door_opens_a_route() {
    let layout = "
        ■■■■■
        s□D□g
        ■■■■■
        ■■■■■
        ■■■■■
    ";
    let Layout { grid, start, goal } = parse_layout(layout);
    let (start, goal) = (start.unwrap(), goal.unwrap());
    let mut world = GridWorld::new(grid, start, Config::default());

    assert_eq!(world.request_move(goal), MoveRequest::Blocked);
    assert!(world.agent.exclamation.is_some());

    // Walk next to the door, open it, then continue
    assert_eq!(world.request_move(Position::new(1, 1)), MoveRequest::Started);
    while world.agent.movement.is_moving() {
        world.tick();
    }
    assert_eq!(world.interact(2, 1), vec![InteractOutcome::Opened]);
    assert_eq!(world.request_move(goal), MoveRequest::Started);
    while world.agent.movement.is_moving() {
        world.tick();
    }
    assert_eq!(world.agent.cell(), goal);
}

#[test]
fn test_out_of_reach_door_is_refused() {
    let mut world = locked_door_world();
    world.agent.give_key("k1");
    world.agent.position = (1.0, 1.0);
    assert_eq!(world.interact(5, 5), vec![InteractOutcome::TooFar]);
    assert_eq!(door_state(&world.grid, 5, 5), Some(DoorState::ClosedLocked));
}

#[test]
fn test_destroyed_wall_becomes_walkable() {
    let mut grid = Grid::with_walls(5, &[(2, 0), (2, 1), (2, 3), (2, 4)]);
    grid.set_wall(2, 2, 9, WallType::Destructible);
    grid.wall_props_mut(2, 2).unwrap().health = 120;
    let (start, goal) = (Position::new(0, 2), Position::new(4, 2));
    assert!(find_path(&grid, start, goal, Connectivity::EightWay).is_empty());

    assert_eq!(grid.damage_wall(2, 2, 100), Some(20));
    assert!(!grid.can_walk_through(2, 2));
    assert_eq!(grid.damage_wall(2, 2, 100), Some(0));
    assert!(grid.can_walk_through(2, 2));
    assert_eq!(find_path(&grid, start, goal, Connectivity::EightWay).len(), 5);
}
