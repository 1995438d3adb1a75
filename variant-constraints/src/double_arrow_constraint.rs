//! Contains the [`DoubleArrowConstraint`] struct.

use crate::equal_sum_constraint::{EqualSumConstraint, SumSet};
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a double arrow: the two circled ends of the line
/// sum to the same total as the cells between them. Reduces to an
/// [`EqualSumConstraint`] over the two groups.
pub struct DoubleArrowConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
}

impl DoubleArrowConstraint {
    pub fn new(cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() < 3 {
            return Err("a double arrow needs at least one cell between its ends".to_owned());
        }
        let specific_name = format!("Double Arrow at {}", cells[0]);
        Ok(Self { specific_name, cells })
    }
}

impl Constraint for DoubleArrowConstraint {
    fn name(&self) -> &str {
        "Double Arrow"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let ends = vec![self.cells[0], *self.cells.last().unwrap()];
        let middle = self.cells[1..self.cells.len() - 1].to_vec();
        let equal = EqualSumConstraint::new(
            board,
            &self.specific_name,
            vec![SumSet::new(ends), SumSet::new(middle)],
        );
        InitResult::unchanged().with_constraints(vec![Arc::new(equal)]).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_middle_follows_ends() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Ends r1c1, r1c4; middle r1c2, r1c3. All in one row.
        let cells: Vec<CellIndex> = (0..4).map(|col| cu.cell(0, col)).collect();
        let constraint = DoubleArrowConstraint::new(cells.clone()).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 3);
        board.set_as_given(cells[3], 4);
        assert!(board.propagate().is_changed());
        // Total 7 over two distinct row cells avoiding 3 and 4: only
        // 1+6 and 2+5 remain.
        assert_eq!(board.cell(cells[1]), ValueMask::from_values(&[1, 2, 5, 6]));
        assert_eq!(board.cell(cells[2]), ValueMask::from_values(&[1, 2, 5, 6]));
    }

    #[test]
    fn test_impossible_ends_caught_by_enforce() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..4).map(|col| cu.cell(0, col)).collect();
        let constraint = DoubleArrowConstraint::new(cells.clone()).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 1);
        // Total 3 cannot be reached by two distinct middle cells that
        // can no longer use 1 or 2.
        assert!(board.set_as_given(cells[3], 2).is_invalid());
    }

    #[test]
    fn test_too_short_rejected() {
        let cu = CellUtility::new(9);
        assert!(DoubleArrowConstraint::new(vec![cu.cell(0, 0), cu.cell(0, 1)]).is_err());
    }
}
