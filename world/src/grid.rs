//! Dense cell storage for the partially revealed maze.

use labyrinth_core::{CellType, Position, SnapshotError};
use log::debug;

/// Single maze cell together with the region label assigned this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    kind: CellType,
    region: u32,
}

impl Cell {
    const fn unknown(position: Position) -> Self {
        Self {
            position,
            kind: CellType::Unknown,
            region: 0,
        }
    }

    /// Position of the cell; fixed for the cell's lifetime.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Most refined type observed for the cell.
    #[must_use]
    pub const fn kind(&self) -> CellType {
        self.kind
    }

    /// Connected region label, or `0` for impassable cells.
    ///
    /// Labels are recomputed every turn and carry no meaning across turns.
    #[must_use]
    pub const fn region(&self) -> u32 {
        self.region
    }

    /// Reports whether the cell can be walked on.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.kind.is_passable()
    }

    pub(crate) fn set_region(&mut self, region: u32) {
        self.region = region;
    }
}

/// Sole owner of every cell in the `width` x `height` rectangle.
///
/// Cells are stored row-major, so iteration order is row 0 left to right,
/// then row 1, and so on. The start and control room are tracked as
/// positions into this storage; the first one observed of each wins.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    start: Option<Position>,
    control: Option<Position>,
}

impl Grid {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::with_capacity(cell_count(width, height));
        for row in 0..height {
            for column in 0..width {
                cells.push(Cell::unknown(position_of(column, row)));
            }
        }

        Self {
            width,
            height,
            cells,
            start: None,
            control: None,
        }
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) const fn start(&self) -> Option<Position> {
        self.start
    }

    pub(crate) const fn control(&self) -> Option<Position> {
        self.control
    }

    pub(crate) fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.column()).ok()?;
        let row = u32::try_from(position.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Parses a full snapshot into row-major cell types without mutating.
    pub(crate) fn parse_snapshot(&self, rows: &[String]) -> Result<Vec<CellType>, SnapshotError> {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        let height = usize::try_from(self.height).unwrap_or(usize::MAX);

        if rows.len() != height {
            return Err(SnapshotError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }

        let mut kinds = Vec::with_capacity(self.cells.len());
        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(SnapshotError::RowWidth {
                    row,
                    expected: width,
                    actual,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let kind = CellType::from_symbol(symbol).ok_or(SnapshotError::InvalidSymbol {
                    column,
                    row,
                    symbol,
                })?;
                kinds.push(kind);
            }
        }

        Ok(kinds)
    }

    /// Refines every cell from a parsed snapshot, returning how many cells
    /// left the unknown state.
    ///
    /// An unknown symbol never overwrites a concrete type.
    pub(crate) fn refine_all(&mut self, kinds: &[CellType]) -> usize {
        let mut revealed = 0;
        for (index, kind) in kinds.iter().copied().enumerate() {
            if self.refine(index, kind) {
                revealed += 1;
            }
        }
        revealed
    }

    fn refine(&mut self, index: usize, kind: CellType) -> bool {
        if kind.is_unknown() {
            return false;
        }

        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };

        let previous = cell.kind;
        if previous != kind && !previous.is_unknown() {
            debug!(
                "cell {} restated from {:?} to {:?}",
                cell.position, previous, kind
            );
        }
        cell.kind = kind;

        if self.start.is_none() && kind == CellType::Start {
            self.start = Some(cell.position);
        }
        if self.control.is_none() && kind == CellType::ControlRoom {
            self.control = Some(cell.position);
        }

        previous.is_unknown()
    }
}

fn cell_count(width: u32, height: u32) -> usize {
    let count = u64::from(width) * u64::from(height);
    usize::try_from(count).unwrap_or(0)
}

fn position_of(column: u32, row: u32) -> Position {
    let column = i32::try_from(column).unwrap_or(i32::MAX);
    let row = i32::try_from(row).unwrap_or(i32::MAX);
    Position::new(column, row)
}
