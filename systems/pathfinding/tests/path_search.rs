use std::collections::{HashMap, VecDeque};

use labyrinth_core::{Command, Event, Position};
use labyrinth_system_pathfinding::PathSearch;
use labyrinth_world::{self as world, query, World};

fn world_from(lines: &[&str], agent: Position) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            width: u32::try_from(lines[0].len()).expect("width fits"),
            height: u32::try_from(lines.len()).expect("height fits"),
            alarm_rounds: 10,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::ObserveTurn {
            agent,
            rows: lines.iter().map(|line| (*line).to_owned()).collect(),
        },
        &mut events,
    );
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::SnapshotRejected { .. })),
        "fixture snapshot should be accepted: {events:?}"
    );
    world
}

/// Plain BFS step count used as an oracle for path lengths.
fn bfs_distance(world: &World, from: Position, to: Position) -> Option<usize> {
    let view = query::grid_view(world).expect("grid configured");
    let mut distances = HashMap::from([(from, 0usize)]);
    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        if cell == to {
            return distances.get(&cell).copied();
        }
        let next = distances[&cell] + 1;
        for neighbor in cell.neighbors() {
            if view.is_passable(neighbor) && !distances.contains_key(&neighbor) {
                let _ = distances.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }
    None
}

fn assert_valid_path(world: &World, path: &[Position], agent: Position, target: Position) {
    assert_eq!(path.first(), Some(&target), "path must start at the target");
    let first_step = *path.last().expect("non-empty path");
    assert_eq!(
        first_step.manhattan_distance(agent),
        1,
        "first step {first_step} must neighbor the agent at {agent}"
    );
    for pair in path.windows(2) {
        assert_eq!(
            pair[0].manhattan_distance(pair[1]),
            1,
            "{} and {} are not one step apart",
            pair[0],
            pair[1]
        );
    }
    let view = query::grid_view(world).expect("grid configured");
    assert!(path.iter().all(|cell| view.is_passable(*cell)));
    assert_eq!(Some(path.len()), bfs_distance(world, agent, target));
}

#[test]
fn corridor_path_walks_straight_to_target() {
    let agent = Position::new(0, 0);
    let world = world_from(&["T....C"], agent);
    let view = query::grid_view(&world).expect("grid configured");

    let path = PathSearch::new().find_path(view, agent, Position::new(5, 0));

    assert_eq!(
        path,
        vec![
            Position::new(5, 0),
            Position::new(4, 0),
            Position::new(3, 0),
            Position::new(2, 0),
            Position::new(1, 0),
        ]
    );
}

#[test]
fn open_room_ties_follow_manhattan_chaining() {
    let agent = Position::new(0, 0);
    let world = world_from(&["T..", "...", "..C"], agent);
    let view = query::grid_view(&world).expect("grid configured");

    let path = PathSearch::new().find_path(view, agent, Position::new(2, 2));

    assert_eq!(
        path,
        vec![
            Position::new(2, 2),
            Position::new(2, 1),
            Position::new(2, 0),
            Position::new(1, 0),
        ]
    );
}

#[test]
fn paths_around_walls_are_valid_and_shortest() {
    let lines = [
        "T.#.....",
        ".##.###.",
        "....#...",
        "##.##.#.",
        "...#..#C",
    ];
    let agent = Position::new(0, 0);
    let world = world_from(&lines, agent);
    let view = query::grid_view(&world).expect("grid configured");
    let mut search = PathSearch::new();

    let targets = [
        Position::new(7, 4),
        Position::new(3, 0),
        Position::new(0, 4),
        Position::new(5, 3),
        Position::new(1, 0),
    ];
    for target in targets {
        let path = search.find_path(view, agent, target);
        assert_valid_path(&world, &path, agent, target);
    }
}

#[test]
fn searching_twice_gives_identical_paths() {
    let lines = ["T...", ".#..", "...C"];
    let agent = Position::new(0, 0);
    let world = world_from(&lines, agent);
    let view = query::grid_view(&world).expect("grid configured");
    let mut search = PathSearch::new();

    let first = search.find_path(view, agent, Position::new(3, 2));
    let second = search.find_path(view, agent, Position::new(3, 2));

    assert_eq!(first, second);
    assert_valid_path(&world, &first, agent, Position::new(3, 2));
}

#[test]
fn unreachable_target_returns_partial_path() {
    let agent = Position::new(0, 0);
    let world = world_from(&["T.#.C"], agent);
    let view = query::grid_view(&world).expect("grid configured");

    let path = PathSearch::new().find_path(view, agent, Position::new(4, 0));

    assert_eq!(path, vec![Position::new(4, 0), Position::new(3, 0)]);
    let last = *path.last().expect("partial path");
    assert!(
        last.manhattan_distance(agent) > 1,
        "a partial path must not pretend to reach the agent"
    );
}

#[test]
fn target_adjacent_to_agent_is_a_single_step() {
    let agent = Position::new(1, 0);
    let world = world_from(&["T.C"], agent);
    let view = query::grid_view(&world).expect("grid configured");

    let path = PathSearch::new().find_path(view, agent, Position::new(2, 0));

    assert_eq!(path, vec![Position::new(2, 0)]);
}

#[test]
fn agent_on_target_needs_no_path() {
    let agent = Position::new(1, 0);
    let world = world_from(&["T.C"], agent);
    let view = query::grid_view(&world).expect("grid configured");

    assert!(PathSearch::new().find_path(view, agent, agent).is_empty());
}

#[test]
fn unknown_cells_are_not_traversed() {
    let agent = Position::new(0, 0);
    let world = world_from(&["T??", "...", "..C"], agent);
    let view = query::grid_view(&world).expect("grid configured");
    let target = Position::new(2, 2);

    let path = PathSearch::new().find_path(view, agent, target);

    assert_eq!(
        path,
        vec![
            Position::new(2, 2),
            Position::new(2, 1),
            Position::new(1, 1),
            Position::new(0, 1),
        ]
    );
    assert_valid_path(&world, &path, agent, target);
}
