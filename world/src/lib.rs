#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the labyrinth agent.

mod grid;
mod regions;

use labyrinth_core::{CellType, Command, Event, Position, SnapshotError};
use log::{debug, info, warn};

pub use grid::Cell;

use grid::Grid;
use regions::RegionLabeler;

/// Represents everything the agent knows about the current game session.
#[derive(Debug)]
pub struct World {
    grid: Option<Grid>,
    labeler: RegionLabeler,
    agent: Option<Position>,
    timer_running: bool,
    alarm_rounds: u32,
    alarm_remaining: Option<u32>,
    turn: u64,
}

impl World {
    /// Creates a world with no configured grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: None,
            labeler: RegionLabeler::default(),
            agent: None,
            timer_running: false,
            alarm_rounds: 0,
            alarm_remaining: None,
            turn: 0,
        }
    }

    fn observe(
        &mut self,
        agent: Position,
        rows: &[String],
        out_events: &mut Vec<Event>,
    ) -> Result<(), SnapshotError> {
        let grid = self.grid.as_mut().ok_or(SnapshotError::GridNotConfigured)?;
        let kinds = grid.parse_snapshot(rows)?;

        let agent_index = grid
            .index(agent)
            .ok_or(SnapshotError::AgentOutOfBounds { agent })?;
        let reported = kinds.get(agent_index).copied().unwrap_or_default();
        let known = grid
            .cells()
            .get(agent_index)
            .map_or(CellType::Unknown, Cell::kind);
        let agent_kind = if reported.is_unknown() { known } else { reported };
        if !agent_kind.is_passable() {
            return Err(SnapshotError::AgentNotPassable { agent });
        }

        let revealed = grid.refine_all(&kinds);
        self.labeler.assign_regions(grid);
        if revealed > 0 {
            debug!("turn {} revealed {revealed} cells", self.turn + 1);
            out_events.push(Event::CellsRevealed { count: revealed });
        }

        self.agent = Some(agent);
        self.turn += 1;

        if self.timer_running {
            self.alarm_remaining = self.alarm_remaining.map(|rounds| rounds.saturating_sub(1));
        } else if agent_kind == CellType::ControlRoom {
            self.timer_running = true;
            self.alarm_remaining = Some(self.alarm_rounds);
            info!(
                "control room reached at {agent}; {} rounds until the alarm",
                self.alarm_rounds
            );
            out_events.push(Event::TimerStarted { at: agent });
        }

        out_events.push(Event::TurnObserved {
            turn: self.turn,
            agent,
        });
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Within a single turn, cell refinement completes before regions are
/// relabeled, and relabeling completes before the agent and timer are
/// updated, so any query issued after `apply` returns sees a consistent turn.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            width,
            height,
            alarm_rounds,
        } => {
            world.grid = Some(Grid::new(width, height));
            world.agent = None;
            world.timer_running = false;
            world.alarm_rounds = alarm_rounds;
            world.alarm_remaining = None;
            world.turn = 0;
            info!("configured {width}x{height} grid, alarm after {alarm_rounds} rounds");
            out_events.push(Event::GridConfigured { width, height });
        }
        Command::ObserveTurn { agent, rows } => {
            if let Err(reason) = world.observe(agent, &rows, out_events) {
                warn!("rejected turn snapshot: {reason}");
                out_events.push(Event::SnapshotRejected { reason });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{AgentState, CellType, Position};

    use super::{Cell, Grid, World};

    /// Read-only view of the configured grid, if any.
    #[must_use]
    pub fn grid_view(world: &World) -> Option<GridView<'_>> {
        world.grid.as_ref().map(|grid| GridView { grid })
    }

    /// Agent position and timer flag, once at least one turn was observed.
    #[must_use]
    pub fn agent_state(world: &World) -> Option<AgentState> {
        world.agent.map(|cell| AgentState {
            cell,
            timer_running: world.timer_running,
        })
    }

    /// Reports whether the agent has ever stood on the control room.
    #[must_use]
    pub fn timer_running(world: &World) -> bool {
        world.timer_running
    }

    /// Rounds left before the alarm goes off, once the timer is running.
    #[must_use]
    pub fn alarm_remaining(world: &World) -> Option<u32> {
        world.alarm_remaining
    }

    /// Number of turns applied since the grid was configured.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Read-only view into the revealed grid and its region labels.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        grid: &'a Grid,
    }

    impl<'a> GridView<'a> {
        /// Provides the grid dimensions as `(width, height)`.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.grid.width(), self.grid.height())
        }

        /// Returns the cell at the provided position, if it lies inside the grid.
        #[must_use]
        pub fn cell(&self, position: Position) -> Option<&'a Cell> {
            self.grid.cell(position)
        }

        /// Type of the cell at `position`; `None` outside the grid.
        #[must_use]
        pub fn cell_type(&self, position: Position) -> Option<CellType> {
            self.cell(position).map(Cell::kind)
        }

        /// Reports whether `position` is inside the grid and passable.
        #[must_use]
        pub fn is_passable(&self, position: Position) -> bool {
            self.cell(position).is_some_and(Cell::is_passable)
        }

        /// Region label at `position`; `0` when impassable or outside.
        #[must_use]
        pub fn region(&self, position: Position) -> u32 {
            self.cell(position).map_or(0, Cell::region)
        }

        /// Reports whether any cardinal neighbor of `position` is still unknown.
        #[must_use]
        pub fn is_near_unknown(&self, position: Position) -> bool {
            position
                .neighbors()
                .any(|neighbor| self.cell_type(neighbor).is_some_and(CellType::is_unknown))
        }

        /// Cells sharing the provided region label, in row-major order.
        pub fn region_cells(&self, region: u32) -> impl Iterator<Item = &'a Cell> + 'a {
            self.grid
                .cells()
                .iter()
                .filter(move |cell| cell.region() == region)
        }

        /// Iterator over every cell in row-major order.
        pub fn cells(&self) -> impl Iterator<Item = &'a Cell> + 'a {
            self.grid.cells().iter()
        }

        /// First start cell observed this session.
        #[must_use]
        pub fn start(&self) -> Option<Position> {
            self.grid.start()
        }

        /// First control room observed this session.
        #[must_use]
        pub fn control(&self) -> Option<Position> {
            self.grid.control()
        }
    }
}
