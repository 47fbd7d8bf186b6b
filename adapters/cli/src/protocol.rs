//! Line-oriented turn protocol spoken over stdin.
//!
//! The session opens with a header line `rows columns rounds`. Every turn then
//! sends `agent_row agent_column` followed by `rows` lines describing the grid.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use labyrinth_core::{Command, Position};

/// Largest grid, in cells, a session header may announce.
pub(crate) const MAX_GRID_CELLS: u64 = 1 << 20;

/// Upper bound on rows reserved up front for a single turn.
const RESERVED_ROWS: usize = 256;

/// Session header announcing the grid size and the alarm length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) alarm_rounds: u32,
}

impl Header {
    pub(crate) fn into_command(self) -> Command {
        Command::ConfigureGrid {
            width: self.columns,
            height: self.rows,
            alarm_rounds: self.alarm_rounds,
        }
    }
}

/// One turn worth of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Turn {
    pub(crate) agent: Position,
    pub(crate) rows: Vec<String>,
}

impl Turn {
    pub(crate) fn into_command(self) -> Command {
        Command::ObserveTurn {
            agent: self.agent,
            rows: self.rows,
        }
    }
}

/// Reads the header and the turns that follow it from any buffered source.
#[derive(Debug)]
pub(crate) struct TurnReader<R> {
    input: R,
    line: String,
    rows: usize,
}

impl<R: BufRead> TurnReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            rows: 0,
        }
    }

    /// Reads the session header; `None` when the input is empty.
    pub(crate) fn read_header(&mut self) -> Result<Option<Header>> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let [rows, columns, alarm_rounds] = parse_numbers::<u32, 3>(line, "header")?;
        if u64::from(rows) * u64::from(columns) > MAX_GRID_CELLS {
            bail!("grid of {rows} rows and {columns} columns exceeds {MAX_GRID_CELLS} cells");
        }
        self.rows = usize::try_from(rows).context("row count does not fit in memory")?;

        Ok(Some(Header {
            rows,
            columns,
            alarm_rounds,
        }))
    }

    /// Reads the next turn; `None` once the input ends cleanly between turns.
    pub(crate) fn read_turn(&mut self) -> Result<Option<Turn>> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let [row, column] = parse_numbers::<i32, 2>(line, "agent position")?;

        let mut rows = Vec::with_capacity(self.rows.min(RESERVED_ROWS));
        for index in 0..self.rows {
            match self.next_line()? {
                Some(line) => rows.push(line.to_owned()),
                None => bail!("input ended after {index} of {} grid rows", self.rows),
            }
        }

        Ok(Some(Turn {
            agent: Position::new(column, row),
            rows,
        }))
    }

    fn next_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        let read = self
            .input
            .read_line(&mut self.line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end()))
    }
}

fn parse_numbers<T, const N: usize>(line: &str, what: &str) -> Result<[T; N]>
where
    T: std::str::FromStr + Copy + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let mut values = [T::default(); N];
    let mut fields = line.split_whitespace();
    for (index, value) in values.iter_mut().enumerate() {
        let field = fields
            .next()
            .with_context(|| format!("{what} line `{line}` has {index} of {N} fields"))?;
        *value = field
            .parse()
            .with_context(|| format!("{what} field `{field}` is not a number"))?;
    }
    if fields.next().is_some() {
        bail!("{what} line `{line}` has more than {N} fields");
    }
    Ok(values)
}
