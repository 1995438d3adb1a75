//! Contains the [`CloneConstraint`] struct for mirrored cell groups.

use variant_solver_lib::prelude::*;

/// A [`Constraint`] forcing two equally shaped cell groups to hold the same
/// values cell for cell. Reduces to equality weak links.
#[derive(Debug)]
pub struct CloneConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    clone_cells: Vec<CellIndex>,
}

impl CloneConstraint {
    pub fn new(cells: Vec<CellIndex>, clone_cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() != clone_cells.len() {
            return Err(format!(
                "Clone groups differ in size: {} vs {}",
                cells.len(),
                clone_cells.len()
            ));
        }
        let specific_name = format!("Clone at {}", cells[0]);
        Ok(Self { specific_name, cells, clone_cells })
    }
}

impl Constraint for CloneConstraint {
    fn name(&self) -> &str {
        "Clone"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let size = board.size();
        let mut result = LogicResult::None;
        for (&a, &b) in self.cells.iter().zip(&self.clone_cells) {
            if a == b {
                continue;
            }
            for (c1, c2) in eq_pairs(a, b, size) {
                result = result.combine(board.add_weak_link(c1, c2));
                if result.is_invalid() {
                    return InitResult::invalid();
                }
            }
        }
        InitResult::from(result).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_clone_mirrors_values() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let constraint =
            CloneConstraint::new(vec![cu.cell(0, 0), cu.cell(0, 1)], vec![cu.cell(5, 5), cu.cell(5, 6)])
                .unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();

        board.set_as_given(cu.cell(0, 0), 4);
        // The mirrored cell collapses to the same value.
        assert!(board.cell(cu.cell(5, 5)).is_given());
        assert_eq!(board.cell(cu.cell(5, 5)).value(), 4);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let cu = CellUtility::new(9);
        assert!(CloneConstraint::new(vec![cu.cell(0, 0)], vec![]).is_err());
    }
}
