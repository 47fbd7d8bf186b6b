//! Glue between the turn protocol, the world and the navigation policy.

use labyrinth_core::{Direction, Event, Position, DIRECTION_VECTORS};
use labyrinth_system_navigation::{NavigationConfig, NavigationPolicy};
use labyrinth_world::{self as world, query, query::GridView, World};
use log::{debug, info, warn};

use crate::protocol::{Header, Turn};

/// Single game session: one configured grid and the policy steering through it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    policy: NavigationPolicy,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(header: Header, config: NavigationConfig) -> Self {
        let mut session = Self {
            world: World::new(),
            policy: NavigationPolicy::new(config),
            events: Vec::new(),
        };
        world::apply(&mut session.world, header.into_command(), &mut session.events);
        session.events.clear();
        session
    }

    /// Applies the turn and returns the direction to print for it.
    pub(crate) fn play(&mut self, turn: Turn) -> Direction {
        let agent = turn.agent;
        self.events.clear();
        world::apply(&mut self.world, turn.into_command(), &mut self.events);

        let mut rejected = false;
        for event in &self.events {
            match event {
                Event::SnapshotRejected { .. } => rejected = true,
                Event::TimerStarted { at } => info!("alarm timer started at {at}"),
                _ => debug!("{event:?}"),
            }
        }
        if let Some(remaining) = query::alarm_remaining(&self.world) {
            debug!("{remaining} rounds left before the alarm");
        }

        let grid = query::grid_view(&self.world);
        if rejected {
            return fallback_direction(grid, agent);
        }

        let (Some(view), Some(state)) = (grid, query::agent_state(&self.world)) else {
            return fallback_direction(grid, agent);
        };
        match self.policy.next_direction(view, state) {
            Ok(direction) => direction,
            Err(error) => {
                warn!("navigation failed at {agent}: {error}");
                fallback_direction(grid, agent)
            }
        }
    }
}

/// First direction, in table order, that leads onto a known passable cell.
fn fallback_direction(grid: Option<GridView<'_>>, agent: Position) -> Direction {
    let first = DIRECTION_VECTORS[0].0;
    let Some(view) = grid else {
        return first;
    };
    DIRECTION_VECTORS
        .iter()
        .map(|(direction, _)| *direction)
        .find(|direction| view.is_passable(agent.step(*direction)))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(rows: u32, columns: u32) -> Header {
        Header {
            rows,
            columns,
            alarm_rounds: 5,
        }
    }

    fn turn(column: i32, row: i32, lines: &[&str]) -> Turn {
        Turn {
            agent: Position::new(column, row),
            rows: lines.iter().map(|line| (*line).to_owned()).collect(),
        }
    }

    #[test]
    fn follows_the_policy_through_a_known_room() {
        let lines = ["T..", ".#.", "..C"];
        let mut session = Session::new(header(3, 3), NavigationConfig::default());

        let mut agent = Position::new(0, 0);
        let mut directions = Vec::new();
        for _ in 0..4 {
            let direction = session.play(turn(agent.column(), agent.row(), &lines));
            directions.push(direction);
            agent = agent.step(direction);
        }

        assert_eq!(
            directions,
            vec![Direction::Right, Direction::Right, Direction::Down, Direction::Down]
        );
        assert_eq!(agent, Position::new(2, 2));
    }

    #[test]
    fn rejected_snapshot_falls_back_to_a_passable_neighbor() {
        let mut session = Session::new(header(2, 2), NavigationConfig::default());
        let _ = session.play(turn(0, 0, &["T#", ".C"]));

        let direction = session.play(turn(0, 0, &["T#", ".x"]));

        assert_eq!(direction, Direction::Down);
    }

    #[test]
    fn policy_errors_fall_back_to_a_passable_neighbor() {
        // Fully explored and no control room in sight.
        let mut session = Session::new(header(1, 3), NavigationConfig::default());

        let direction = session.play(turn(1, 0, &["T.."]));

        assert_eq!(direction, Direction::Right);
    }

    #[test]
    fn unknown_surroundings_default_to_the_first_direction() {
        assert_eq!(fallback_direction(None, Position::new(0, 0)), Direction::Right);
    }
}
