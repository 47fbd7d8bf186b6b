//! Plays whole games against a local referee that only reveals the square of
//! cells within a fixed radius around the agent.

use labyrinth_core::{CellType, Command, Direction, Event, Position};
use labyrinth_system_navigation::{NavigationConfig, NavigationPolicy};
use labyrinth_world::{self as world, query, World};

const VIEW_RADIUS: i32 = 2;

const CORRIDOR: [&str; 3] = ["##########", "#T......C#", "##########"];

const WINDING: [&str; 15] = [
    "#####################.....####",
    "########........#.############",
    "#################.#......T####",
    "############...#..#.#######.##",
    "######...##.#######...#####.##",
    "######...##.#C..#####.#####.##",
    "######...##.###.......########",
    "###########.#.########.......#",
    "#######..##...##....##########",
    "#######################..#####",
    "######.....############..#####",
    "######.....############.######",
    "######.....#########....######",
    "#####################..#######",
    "##############################",
];

struct Referee {
    hidden: Vec<Vec<char>>,
    revealed: Vec<Vec<char>>,
    agent: Position,
}

impl Referee {
    fn new(maze: &[&str]) -> Self {
        let hidden: Vec<Vec<char>> = maze.iter().map(|row| row.chars().collect()).collect();
        let revealed = hidden.iter().map(|row| vec!['?'; row.len()]).collect();
        let agent = Self::find(&hidden, 'T').expect("maze has a start");
        Self {
            hidden,
            revealed,
            agent,
        }
    }

    fn find(cells: &[Vec<char>], symbol: char) -> Option<Position> {
        cells.iter().enumerate().find_map(|(row, line)| {
            line.iter().position(|cell| *cell == symbol).map(|column| {
                Position::new(
                    i32::try_from(column).expect("column fits"),
                    i32::try_from(row).expect("row fits"),
                )
            })
        })
    }

    fn symbol(cells: &[Vec<char>], position: Position) -> Option<char> {
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        cells.get(row)?.get(column).copied()
    }

    fn snapshot(&mut self) -> Vec<String> {
        for row_offset in -VIEW_RADIUS..=VIEW_RADIUS {
            for column_offset in -VIEW_RADIUS..=VIEW_RADIUS {
                let cell = Position::new(
                    self.agent.column() + column_offset,
                    self.agent.row() + row_offset,
                );
                if let Some(symbol) = Self::symbol(&self.hidden, cell) {
                    let row = usize::try_from(cell.row()).expect("inside");
                    let column = usize::try_from(cell.column()).expect("inside");
                    self.revealed[row][column] = symbol;
                }
            }
        }
        self.revealed.iter().map(|row| row.iter().collect()).collect()
    }

    fn play(&mut self, direction: Direction) {
        self.agent = self.agent.step(direction);
        let symbol = Self::symbol(&self.hidden, self.agent).expect("agent stays inside");
        assert!(
            CellType::from_symbol(symbol).is_some_and(CellType::is_passable),
            "agent walked into {symbol:?} at {}",
            self.agent
        );
    }
}

struct Outcome {
    to_control: Vec<Direction>,
    to_start: Vec<Direction>,
    events: Vec<Event>,
    world: World,
}

fn run(maze: &[&str], alarm_rounds: u32, config: NavigationConfig, max_turns: usize) -> Outcome {
    let mut referee = Referee::new(maze);
    let start = referee.agent;
    let mut world = World::new();
    let mut policy = NavigationPolicy::new(config);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            width: u32::try_from(maze[0].len()).expect("width fits"),
            height: u32::try_from(maze.len()).expect("height fits"),
            alarm_rounds,
        },
        &mut events,
    );

    let mut to_control = Vec::new();
    let mut to_start = Vec::new();
    let mut log = Vec::new();
    for _ in 0..max_turns {
        events.clear();
        let rows = referee.snapshot();
        world::apply(
            &mut world,
            Command::ObserveTurn {
                agent: referee.agent,
                rows,
            },
            &mut events,
        );
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::SnapshotRejected { .. })),
            "referee snapshot rejected: {events:?}"
        );
        log.extend(events.iter().cloned());

        let timer_running = query::timer_running(&world);
        if timer_running && referee.agent == start {
            return Outcome {
                to_control,
                to_start,
                events: log,
                world,
            };
        }

        let view = query::grid_view(&world).expect("grid configured");
        let agent = query::agent_state(&world).expect("turn observed");
        let direction = policy
            .next_direction(view, agent)
            .unwrap_or_else(|error| panic!("no direction at {}: {error}", referee.agent));
        if timer_running {
            to_start.push(direction);
        } else {
            to_control.push(direction);
        }
        referee.play(direction);
    }
    panic!("game not finished within {max_turns} turns");
}

#[test]
fn corridor_is_walked_to_the_end_and_back() {
    let outcome = run(&CORRIDOR, 8, NavigationConfig::default(), 50);

    assert_eq!(outcome.to_control, vec![Direction::Right; 7]);
    assert_eq!(outcome.to_start, vec![Direction::Left; 7]);
    assert_eq!(query::alarm_remaining(&outcome.world), Some(1));
}

#[test]
fn winding_maze_is_solved_before_the_alarm() {
    let outcome = run(&WINDING, 22, NavigationConfig::default(), 200);

    assert_eq!(outcome.to_control.len(), 21);
    assert_eq!(outcome.to_start.len(), 21);
    assert_eq!(query::alarm_remaining(&outcome.world), Some(1));
    let view = query::grid_view(&outcome.world).expect("grid configured");
    assert_eq!(view.control(), Some(Position::new(13, 5)));
    assert_eq!(view.start(), Some(Position::new(25, 2)));
}

#[test]
fn revalidation_does_not_change_an_undisturbed_game() {
    let plain = run(&WINDING, 22, NavigationConfig::default(), 200);
    let revalidating = run(
        &WINDING,
        22,
        NavigationConfig {
            revalidate_cached_paths: true,
            ..NavigationConfig::default()
        },
        200,
    );

    assert_eq!(plain.to_control, revalidating.to_control);
    assert_eq!(plain.to_start, revalidating.to_start);
}

#[test]
fn replaying_the_same_game_is_deterministic() {
    let first = run(&WINDING, 22, NavigationConfig::default(), 200);
    let second = run(&WINDING, 22, NavigationConfig::default(), 200);

    assert_eq!(first.events, second.events, "replay diverged between runs");
    assert_eq!(first.to_control, second.to_control);
    assert_eq!(first.to_start, second.to_start);

    let timer_starts = first
        .events
        .iter()
        .filter(|event| matches!(event, Event::TimerStarted { .. }))
        .count();
    assert_eq!(timer_starts, 1);

    let revealed: usize = first
        .events
        .iter()
        .map(|event| match event {
            Event::CellsRevealed { count } => *count,
            _ => 0,
        })
        .sum();
    assert_eq!(revealed, 117);
    assert_eq!(query::turn(&first.world), 43);
}
