#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-level navigation policy that picks one direction per turn.
//!
//! Each call evaluates three goals in priority order: retreat to the start
//! once the alarm timer runs, explore the nearest unknown frontier of the
//! agent's region, and otherwise advance to the control room. Paths to the
//! start and to the control room are cached and drained one step per turn;
//! frontier paths are recomputed every turn.

mod config;

use std::fmt;

use labyrinth_core::{AgentState, Direction, Position};
use labyrinth_system_pathfinding::PathSearch;
use labyrinth_world::{query::GridView, Cell};
use log::{debug, warn};
use thiserror::Error;

pub use config::{NavigationConfig, DEFAULT_FRONTIER_CANDIDATES};

/// Fixed cells the policy navigates toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landmark {
    /// Cell the agent must return to once the timer runs.
    Start,
    /// Cell that starts the alarm timer.
    ControlRoom,
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::ControlRoom => f.write_str("control room"),
        }
    }
}

/// Reasons the policy could not produce a direction this turn.
///
/// All of them are soft: the next turn recomputes from fresh grid state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The landmark required by the current goal has not been observed.
    #[error("the {0} has not been observed yet")]
    MissingLandmark(Landmark),
    /// The computed path holds no step, e.g. the agent already stands on the target.
    #[error("no step leads from {agent} toward {target}")]
    NoStep {
        /// Agent position for the turn.
        agent: Position,
        /// Target the empty path was computed for.
        target: Position,
    },
    /// The next path step is not one cardinal step from the agent.
    #[error("planned step {to} is not adjacent to {from}")]
    NotAdjacent {
        /// Agent position for the turn.
        from: Position,
        /// Step popped from the path.
        to: Position,
    },
}

/// Decision procedure invoked once per turn after the world was refreshed.
#[derive(Debug, Default)]
pub struct NavigationPolicy {
    config: NavigationConfig,
    search: PathSearch,
    path_to_start: Vec<Position>,
    path_to_control: Vec<Position>,
}

impl NavigationPolicy {
    /// Creates a policy with empty path caches.
    #[must_use]
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            search: PathSearch::new(),
            path_to_start: Vec::new(),
            path_to_control: Vec::new(),
        }
    }

    /// Chooses the direction for the current turn.
    ///
    /// Retreating to the start takes priority whenever the timer runs.
    /// Otherwise the policy explores while the agent's region still borders
    /// unknown cells, and heads for the control room once it does not.
    pub fn next_direction(
        &mut self,
        grid: GridView<'_>,
        agent: AgentState,
    ) -> Result<Direction, NavigationError> {
        if agent.timer_running {
            let start = grid
                .start()
                .ok_or(NavigationError::MissingLandmark(Landmark::Start))?;
            debug!("timer running, retreating from {} to {start}", agent.cell);
            return self.follow_cached(Landmark::Start, grid, agent.cell, start);
        }

        let frontier = frontier_cells(grid, agent.cell, self.config.candidate_limit());
        if !frontier.is_empty() {
            return self.explore(grid, agent.cell, &frontier);
        }

        let control = grid
            .control()
            .ok_or(NavigationError::MissingLandmark(Landmark::ControlRoom))?;
        debug!(
            "region around {} fully explored, advancing to {control}",
            agent.cell
        );
        self.follow_cached(Landmark::ControlRoom, grid, agent.cell, control)
    }

    /// Picks the shortest path among the frontier candidates; the earlier
    /// candidate wins ties.
    fn explore(
        &mut self,
        grid: GridView<'_>,
        agent: Position,
        frontier: &[Position],
    ) -> Result<Direction, NavigationError> {
        let mut closest: Option<Vec<Position>> = None;
        for &candidate in frontier {
            let path = self.search.find_path(grid, agent, candidate);
            if path.is_empty() {
                continue;
            }
            if closest.as_ref().map_or(true, |best| path.len() < best.len()) {
                closest = Some(path);
            }
        }

        let target = frontier.first().copied().unwrap_or(agent);
        let step = closest
            .and_then(|mut path| path.pop())
            .ok_or(NavigationError::NoStep { agent, target })?;
        debug!("exploring from {agent} via {step}");

        Direction::between(agent, step).ok_or(NavigationError::NotAdjacent {
            from: agent,
            to: step,
        })
    }

    fn follow_cached(
        &mut self,
        landmark: Landmark,
        grid: GridView<'_>,
        agent: Position,
        target: Position,
    ) -> Result<Direction, NavigationError> {
        let revalidate = self.config.revalidate_cached_paths;
        let cache = match landmark {
            Landmark::Start => &mut self.path_to_start,
            Landmark::ControlRoom => &mut self.path_to_control,
        };

        if revalidate {
            if let Some(&step) = cache.last() {
                if Direction::between(agent, step).is_none() || !grid.is_passable(step) {
                    debug!("cached {landmark} step {step} is stale at {agent}, recomputing");
                    cache.clear();
                }
            }
        }

        if cache.is_empty() {
            *cache = self.search.find_path(grid, agent, target);
            debug!("cached {} steps toward the {landmark}", cache.len());
        }

        let step = cache
            .pop()
            .ok_or(NavigationError::NoStep { agent, target })?;

        match Direction::between(agent, step) {
            Some(direction) => Ok(direction),
            None => {
                warn!("cached {landmark} step {step} is not adjacent to {agent}, dropping path");
                cache.clear();
                Err(NavigationError::NotAdjacent {
                    from: agent,
                    to: step,
                })
            }
        }
    }
}

/// Passable cells of the agent's region that border an unknown cell, in
/// row-major order, capped at `limit`.
fn frontier_cells(grid: GridView<'_>, agent: Position, limit: usize) -> Vec<Position> {
    let region = grid.region(agent);
    if region == 0 {
        return Vec::new();
    }

    grid.region_cells(region)
        .map(Cell::position)
        .filter(|cell| grid.is_near_unknown(*cell))
        .take(limit)
        .collect()
}
