//! Contains the [`SingleCellConstraint`] struct for rules confined to one
//! cell: parity, pencilmark givens, and local minimum/maximum cells.

use variant_solver_lib::prelude::*;

/// What a single-cell marker demands.
#[derive(Debug, Clone)]
pub enum SingleCellKind {
    /// The cell holds an odd value.
    Odd,
    /// The cell holds an even value.
    Even,
    /// The cell is restricted to the mask (given digits and pencilmarks).
    Pencilmarks(ValueMask),
    /// The cell is lower than each orthogonal neighbor outside the group.
    Minimum,
    /// The cell is higher than each orthogonal neighbor outside the group.
    Maximum,
}

/// A [`Constraint`] for one marked cell. Parity and pencilmark variants
/// reduce to a mask intersection; minimum/maximum reduce to ordering weak
/// links against the orthogonal neighbors.
#[derive(Debug)]
pub struct SingleCellConstraint {
    specific_name: String,
    cell: CellIndex,
    kind: SingleCellKind,
    /// Cells carrying the same min/max marker; comparisons against these
    /// are skipped.
    group: Vec<CellIndex>,
}

impl SingleCellConstraint {
    pub fn new(specific_name: &str, cell: CellIndex, kind: SingleCellKind) -> Self {
        Self { specific_name: specific_name.to_owned(), cell, kind, group: Vec::new() }
    }

    pub fn odd(cell: CellIndex) -> Self {
        Self::new(&format!("Odd at {}", cell), cell, SingleCellKind::Odd)
    }

    pub fn even(cell: CellIndex) -> Self {
        Self::new(&format!("Even at {}", cell), cell, SingleCellKind::Even)
    }

    pub fn pencilmarks(cell: CellIndex, mask: ValueMask) -> Self {
        Self::new(&format!("Pencilmarks at {}", cell), cell, SingleCellKind::Pencilmarks(mask))
    }

    pub fn minimum(cell: CellIndex, group: Vec<CellIndex>) -> Self {
        let mut constraint = Self::new(&format!("Minimum at {}", cell), cell, SingleCellKind::Minimum);
        constraint.group = group;
        constraint
    }

    pub fn maximum(cell: CellIndex, group: Vec<CellIndex>) -> Self {
        let mut constraint = Self::new(&format!("Maximum at {}", cell), cell, SingleCellKind::Maximum);
        constraint.group = group;
        constraint
    }
}

impl Constraint for SingleCellConstraint {
    fn name(&self) -> &str {
        "Single Cell"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let size = board.size();
        let result = match &self.kind {
            SingleCellKind::Odd => board.keep_cell_mask(self.cell, ValueMask::odd(size)),
            SingleCellKind::Even => board.keep_cell_mask(self.cell, ValueMask::even(size)),
            SingleCellKind::Pencilmarks(mask) => board.keep_cell_mask(self.cell, *mask),
            SingleCellKind::Minimum | SingleCellKind::Maximum => {
                let mut result = LogicResult::None;
                for neighbor in self.cell.orthogonal_neighbors() {
                    if self.group.contains(&neighbor) {
                        continue;
                    }
                    let pairs = match self.kind {
                        SingleCellKind::Minimum => lt_pairs(self.cell, neighbor, 1, size),
                        _ => lt_pairs(neighbor, self.cell, 1, size),
                    };
                    for (a, b) in pairs {
                        result = result.combine(board.add_weak_link(a, b));
                        if result.is_invalid() {
                            return InitResult::invalid();
                        }
                    }
                }
                result
            }
        };
        if result.is_invalid() {
            return InitResult::invalid();
        }
        InitResult::from(result).and_delete_self()
    }
}
