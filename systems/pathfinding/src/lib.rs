#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Layered breadth-first path search over the revealed labyrinth.

use labyrinth_core::Position;
use labyrinth_world::query::GridView;
use log::{debug, trace, warn};

/// Reusable search workspace producing cell-to-cell paths toward a target.
///
/// The search grows rings outward from the target over passable cells and
/// records each cell's ring index as its distance to the target. Expansion
/// stops as soon as a ring touches the agent's own cell. The path is then
/// rebuilt from the outermost ring inward, picking in every ring the cell
/// closest (Manhattan) to the previously picked one, starting from the agent.
///
/// Distances live in a scratch buffer that is reset at the start of every
/// search and carries no meaning between calls.
#[derive(Clone, Debug, Default)]
pub struct PathSearch {
    width: u32,
    height: u32,
    distances: Vec<Option<u32>>,
    explored: Vec<Position>,
    frontier: Vec<Position>,
    next_frontier: Vec<Position>,
}

/// Result of growing the search by one ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expansion {
    /// New cells were added to the explored set.
    Grew,
    /// No unexplored passable neighbor remained.
    Exhausted,
    /// A frontier cell neighbors the agent; the ring is discarded.
    TouchedAgent,
}

impl PathSearch {
    /// Creates an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a path from `agent` to `target` over known passable cells.
    ///
    /// The returned sequence starts with `target` and ends with the first
    /// step the agent should take, so callers consume it with `pop`. Its
    /// length equals the number of steps between the agent and the target.
    ///
    /// An unreachable target is not an error: the best partial
    /// reconstruction is returned and its last element will not neighbor the
    /// agent. When the agent already stands on the target the path is empty.
    pub fn find_path(
        &mut self,
        grid: GridView<'_>,
        agent: Position,
        target: Position,
    ) -> Vec<Position> {
        if agent == target {
            return Vec::new();
        }

        let (width, height) = grid.dimensions();
        self.reset(width, height);

        let Some(target_index) = self.index(target) else {
            warn!("path target {target} lies outside the grid");
            return Vec::new();
        };

        self.distances[target_index] = Some(0);
        self.explored.push(target);
        self.frontier.push(target);

        let mut distance = 0;
        let touched_agent = loop {
            distance += 1;
            match self.expand(grid, agent, distance) {
                Expansion::Grew => {}
                Expansion::Exhausted => break false,
                Expansion::TouchedAgent => break true,
            }
        };

        if !touched_agent {
            warn!(
                "target {target} is unreachable from {agent}; returning partial path over {} cells",
                self.explored.len()
            );
        }

        let path = self.reconstruct(agent);
        debug!("path from {agent} to {target}: {} steps", path.len());
        path
    }

    fn reset(&mut self, width: u32, height: u32) {
        let cell_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        self.width = width;
        self.height = height;
        self.distances.clear();
        self.distances.resize(cell_count, None);
        self.explored.clear();
        self.frontier.clear();
        self.next_frontier.clear();
    }

    fn expand(&mut self, grid: GridView<'_>, agent: Position, distance: u32) -> Expansion {
        self.next_frontier.clear();

        for &cell in &self.frontier {
            for neighbor in cell.neighbors() {
                if neighbor == agent {
                    return Expansion::TouchedAgent;
                }

                if !grid.is_passable(neighbor) {
                    continue;
                }

                let Some(index) = index(self.width, self.height, neighbor) else {
                    continue;
                };

                if self.distances[index].is_some() {
                    continue;
                }

                self.distances[index] = Some(distance);
                self.next_frontier.push(neighbor);
            }
        }

        if self.next_frontier.is_empty() {
            return Expansion::Exhausted;
        }

        trace!("ring {distance} holds {} cells", self.next_frontier.len());
        self.explored.extend_from_slice(&self.next_frontier);
        std::mem::swap(&mut self.frontier, &mut self.next_frontier);
        Expansion::Grew
    }

    /// Drains the explored set ring by ring, outermost first.
    fn reconstruct(&mut self, agent: Position) -> Vec<Position> {
        let mut path = Vec::new();
        let mut previous = agent;

        while let Some(&last) = self.explored.last() {
            let ring = self.distance(last);
            // Rings are appended in order, so the outermost one is a suffix.
            let ring_start = self
                .explored
                .iter()
                .rposition(|cell| self.distance(*cell) != ring)
                .map_or(0, |index| index + 1);
            let mut cells = self.explored.split_off(ring_start);

            // The structurally last cell is considered first, then the rest in
            // exploration order; the first closest candidate wins.
            let last = cells.pop().unwrap_or(last);
            let chosen = std::iter::once(last)
                .chain(cells)
                .min_by_key(|cell| cell.manhattan_distance(previous))
                .unwrap_or(last);

            path.push(chosen);
            previous = chosen;
        }

        path.reverse();
        path
    }

    fn distance(&self, cell: Position) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.distances.get(index).copied().flatten())
    }

    fn index(&self, cell: Position) -> Option<usize> {
        index(self.width, self.height, cell)
    }
}

fn index(width: u32, height: u32, cell: Position) -> Option<usize> {
    let column = u32::try_from(cell.column()).ok()?;
    let row = u32::try_from(cell.row()).ok()?;
    if column >= width || row >= height {
        return None;
    }

    let width = usize::try_from(width).ok()?;
    let column = usize::try_from(column).ok()?;
    let row = usize::try_from(row).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
