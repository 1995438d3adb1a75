//! Contains the [`XSumConstraint`] struct.

use crate::fixed_sum_constraint::FixedSumConstraint;
use crate::or_constraint::OrConstraint;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for an X-sum: reading a line from its clue edge, the
/// first X cells sum to the clue, where X is the first cell's value.
///
/// X itself is the case split; initialization builds an [`OrConstraint`]
/// with one subboard per viable X, each pinning the first cell and
/// carrying a [`FixedSumConstraint`] over the first X cells.
pub struct XSumConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    sum: usize,
}

impl XSumConstraint {
    pub fn new(cells: Vec<CellIndex>, sum: usize) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("an x-sum needs a line of cells".to_owned());
        }
        let specific_name = format!("X-Sum {} at {}", sum, cells[0]);
        Ok(Self { specific_name, cells, sum })
    }
}

impl Constraint for XSumConstraint {
    fn name(&self) -> &str {
        "X-Sum"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let first = self.cells[0];

        let mut subboards = Vec::new();
        for x in board.cell(first).without_given() {
            if x > self.cells.len() {
                continue;
            }
            let mut sub = board.subboard_clone();
            if sub.keep_cell_mask(first, ValueMask::from_value(x)).is_invalid() {
                continue;
            }
            if x > 1 {
                let fixed = FixedSumConstraint::with_name(
                    &mut sub,
                    &self.specific_name,
                    &self.cells[..x],
                    self.sum,
                );
                sub.add_constraint(Arc::new(fixed));
            } else if self.sum != 1 {
                continue;
            }
            subboards.push(sub);
        }

        if subboards.is_empty() {
            return InitResult::invalid();
        }
        let or = OrConstraint::new(board, &self.specific_name, subboards);
        InitResult::unchanged().with_constraints(vec![Arc::new(or)]).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_xsum_small_clue() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        // Clue 1 is only reachable with X = 1.
        let constraint = XSumConstraint::new(cells.clone(), 1).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert_eq!(board.cell(cells[0]).value(), 1);
    }

    #[test]
    fn test_xsum_prunes_first_cell() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        // Clue 6 works as X=1 (no: needs sum 1), X=2 (6 = 2+4), X=3
        // (6 = 3+2+1). Larger X overshoots: X=4 needs 4 distinct cells
        // containing the 4, min 4+1+2+3 = 10 > 6.
        let constraint = XSumConstraint::new(cells.clone(), 6).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        let _ = board.propagate();
        assert_eq!(board.cell(cells[0]).without_given(), ValueMask::from_values(&[2, 3]));
    }

    #[test]
    fn test_xsum_full_line() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        // Clue 45 covers the whole row, so X = 9.
        let constraint = XSumConstraint::new(cells.clone(), 45).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        let _ = board.propagate();
        assert_eq!(board.cell(cells[0]).value(), 9);
    }
}
