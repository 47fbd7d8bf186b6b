//! Connected-region labeling over passable cells.

use crate::grid::Grid;

/// Two-pass connected-component labeler with reusable union-find buffers.
///
/// The first pass scans row-major, looking only at the left and above
/// neighbors of each passable cell. A cell with no labeled neighbor opens a
/// new provisional label; a cell joining two different labels takes the
/// smaller one and records the pair as equivalent. The second pass rewrites
/// every provisional label to the smallest label of its equivalence class.
#[derive(Clone, Debug, Default)]
pub(crate) struct RegionLabeler {
    /// Union-find parent per provisional label. Slot `0` is the impassable
    /// sentinel and never joins a class.
    parent: Vec<u32>,
}

impl RegionLabeler {
    /// Recomputes the region label of every cell in place.
    pub(crate) fn assign_regions(&mut self, grid: &mut Grid) {
        self.parent.clear();
        self.parent.push(0);

        let width = usize::try_from(grid.width()).unwrap_or(0);
        let height = usize::try_from(grid.height()).unwrap_or(0);
        let cells = grid.cells_mut();

        for row in 0..height {
            for column in 0..width {
                let index = row * width + column;
                if !cells[index].is_passable() {
                    cells[index].set_region(0);
                    continue;
                }

                let left = if column > 0 {
                    cells[index - 1].region()
                } else {
                    0
                };
                let above = if row > 0 {
                    cells[index - width].region()
                } else {
                    0
                };

                let region = match (left, above) {
                    (0, 0) => self.open_label(),
                    (left, above) if left == 0 || above == 0 || left == above => left.max(above),
                    (left, above) => {
                        self.union(left, above);
                        left.min(above)
                    }
                };
                cells[index].set_region(region);
            }
        }

        for cell in cells.iter_mut() {
            let region = cell.region();
            if region != 0 {
                let resolved = self.find(region);
                cell.set_region(resolved);
            }
        }
    }

    fn open_label(&mut self) -> u32 {
        let label = u32::try_from(self.parent.len()).unwrap_or(u32::MAX);
        self.parent.push(label);
        label
    }

    /// Root of the label's class, compressing the walked path.
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut current = label;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }

        root
    }

    /// Joins two classes. The smaller root always wins, so every root is the
    /// minimum label of its class.
    fn union(&mut self, first: u32, second: u32) {
        let first_root = self.find(first);
        let second_root = self.find(second);
        if first_root == second_root {
            return;
        }

        let (keep, absorb) = if first_root < second_root {
            (first_root, second_root)
        } else {
            (second_root, first_root)
        };
        self.parent[absorb as usize] = keep;
    }
}
