#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the labyrinth agent.
//!
//! This crate defines the message surface that connects the turn-loop
//! adapter, the authoritative world, and the pure decision systems. The
//! adapter submits [`Command`] values describing each observed turn, the world
//! executes those commands via its `apply` entry point, and then reports
//! [`Event`] values describing what changed. Systems query immutable views of
//! the world and answer with a single [`Direction`] per turn.

use std::{fmt, ops::Add};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that stepping off the edge of the grid yields a
/// representable position which lookups simply reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    column: i32,
    row: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Straight-line distance between two positions.
    ///
    /// Informational only; no decision in the agent depends on it.
    #[must_use]
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let columns = f64::from(other.column) - f64::from(self.column);
        let rows = f64::from(other.row) - f64::from(self.row);
        columns.hypot(rows)
    }

    /// Position reached by taking a single step in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Position {
        self + direction.vector()
    }

    /// Cardinal neighbors in [`DIRECTION_VECTORS`] order.
    ///
    /// Neighbors outside any grid are still yielded; callers bound them.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        DIRECTION_VECTORS
            .into_iter()
            .map(move |(_, vector)| self + vector)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.column + other.column, self.row + other.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement directions the agent may emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

/// Ordered association between directions and their unit vectors.
///
/// The order is load-bearing: neighbor enumeration, frontier detection and
/// direction resolution all walk this table front to back, so tie-breaks
/// depend on it.
pub const DIRECTION_VECTORS: [(Direction, Position); 4] = [
    (Direction::Right, Position::new(1, 0)),
    (Direction::Left, Position::new(-1, 0)),
    (Direction::Up, Position::new(0, -1)),
    (Direction::Down, Position::new(0, 1)),
];

impl Direction {
    /// Unit vector travelled by a single step in this direction.
    #[must_use]
    pub const fn vector(self) -> Position {
        match self {
            Self::Up => Position::new(0, -1),
            Self::Right => Position::new(1, 0),
            Self::Down => Position::new(0, 1),
            Self::Left => Position::new(-1, 0),
        }
    }

    /// Resolves the direction that moves `from` onto `to`.
    ///
    /// Returns `None` unless the two positions are exactly one cardinal step
    /// apart.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let offset = Position::new(to.column() - from.column(), to.row() - from.row());
        DIRECTION_VECTORS
            .into_iter()
            .find(|(_, vector)| *vector == offset)
            .map(|(direction, _)| direction)
    }

    /// Protocol token printed for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knowledge the agent holds about a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Not yet observed.
    #[default]
    Unknown,
    /// Open floor.
    Empty,
    /// Cell the agent started on and must return to.
    Start,
    /// Cell that triggers the alarm countdown when entered.
    ControlRoom,
    /// Impassable cell.
    Wall,
}

impl CellType {
    /// Parses a protocol symbol from the `?.TC#` alphabet.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '?' => Some(Self::Unknown),
            '.' => Some(Self::Empty),
            'T' => Some(Self::Start),
            'C' => Some(Self::ControlRoom),
            '#' => Some(Self::Wall),
            _ => None,
        }
    }

    /// Protocol symbol representing this cell type.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Unknown => '?',
            Self::Empty => '.',
            Self::Start => 'T',
            Self::ControlRoom => 'C',
            Self::Wall => '#',
        }
    }

    /// Empty, start and control room cells can be walked on.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Empty | Self::Start | Self::ControlRoom)
    }

    /// Reports whether the cell is still unobserved.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Read-only description of the agent for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentState {
    /// Cell the agent currently stands on.
    pub cell: Position,
    /// Set once the agent has stood on the control room; never cleared.
    pub timer_running: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the session grid with an all-unknown grid of the given size.
    ConfigureGrid {
        /// Number of columns in the maze.
        width: u32,
        /// Number of rows in the maze.
        height: u32,
        /// Turns between the alarm triggering and going off.
        alarm_rounds: u32,
    },
    /// Applies one turn of input: the agent position and a full grid snapshot.
    ObserveTurn {
        /// Cell the agent occupies this turn.
        agent: Position,
        /// `height` rows of `width` symbols from the `?.TC#` alphabet.
        rows: Vec<String>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a fresh grid was configured.
    GridConfigured {
        /// Number of columns in the new grid.
        width: u32,
        /// Number of rows in the new grid.
        height: u32,
    },
    /// Reports how many cells left the unknown state this turn.
    CellsRevealed {
        /// Count of cells refined from unknown to a concrete type.
        count: usize,
    },
    /// Announces that the agent reached the control room for the first time.
    TimerStarted {
        /// Control room position.
        at: Position,
    },
    /// Confirms that a turn snapshot was applied.
    TurnObserved {
        /// One-based index of the applied turn.
        turn: u64,
        /// Agent position recorded for the turn.
        agent: Position,
    },
    /// Reports that a turn snapshot was rejected without mutating the world.
    SnapshotRejected {
        /// Specific reason the snapshot failed validation.
        reason: SnapshotError,
    },
}

/// Reasons a turn snapshot may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A turn arrived before any grid was configured.
    #[error("no grid has been configured")]
    GridNotConfigured,
    /// The snapshot did not contain one row per grid row.
    #[error("expected {expected} rows, received {actual}")]
    RowCount {
        /// Rows required by the configured grid.
        expected: usize,
        /// Rows present in the snapshot.
        actual: usize,
    },
    /// A row did not contain one symbol per grid column.
    #[error("row {row} has {actual} symbols, expected {expected}")]
    RowWidth {
        /// Zero-based index of the offending row.
        row: usize,
        /// Columns required by the configured grid.
        expected: usize,
        /// Symbols present in the row.
        actual: usize,
    },
    /// A symbol outside the `?.TC#` alphabet was encountered.
    #[error("unexpected symbol {symbol:?} at column {column}, row {row}")]
    InvalidSymbol {
        /// Zero-based column of the symbol.
        column: usize,
        /// Zero-based row of the symbol.
        row: usize,
        /// Offending character.
        symbol: char,
    },
    /// The agent position lies outside the configured grid.
    #[error("agent position {agent} lies outside the grid")]
    AgentOutOfBounds {
        /// Reported agent position.
        agent: Position,
    },
    /// The agent position does not refer to a passable cell.
    #[error("agent position {agent} is not a passable cell")]
    AgentNotPassable {
        /// Reported agent position.
        agent: Position,
    },
}
