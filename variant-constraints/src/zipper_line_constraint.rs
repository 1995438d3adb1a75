//! Contains the [`ZipperLineConstraint`] struct.

use crate::equal_sum_constraint::{EqualSumConstraint, SumSet};
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a zipper line: cells an equal distance from the
/// line's midpoint sum to the same total, and on odd-length lines the
/// center cell *is* that total. Reduces to an [`EqualSumConstraint`] over
/// the mirrored pairs (plus the center singleton).
pub struct ZipperLineConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
}

impl ZipperLineConstraint {
    pub fn new(cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() < 2 {
            return Err("a zipper line needs at least two cells".to_owned());
        }
        let specific_name = format!("Zipper Line at {}", cells[0]);
        Ok(Self { specific_name, cells })
    }
}

impl Constraint for ZipperLineConstraint {
    fn name(&self) -> &str {
        "Zipper Line"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let len = self.cells.len();
        let mut sets = Vec::new();
        for i in 0..len / 2 {
            sets.push(SumSet::new(vec![self.cells[i], self.cells[len - 1 - i]]));
        }
        if len % 2 == 1 {
            sets.push(SumSet::new(vec![self.cells[len / 2]]));
        }
        let equal = EqualSumConstraint::new(board, &self.specific_name, sets);
        InitResult::unchanged().with_constraints(vec![Arc::new(equal)]).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_center_is_pair_total() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Line r1c1, r1c2, r1c3: center r1c2 equals r1c1 + r1c3.
        let cells: Vec<CellIndex> = (0..3).map(|col| cu.cell(0, col)).collect();
        let constraint = ZipperLineConstraint::new(cells.clone()).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // Two distinct row cells sum to at least 3.
        assert!(!board.cell(cells[1]).has(1));
        assert!(!board.cell(cells[1]).has(2));

        board.set_as_given(cells[0], 2);
        board.set_as_given(cells[2], 5);
        assert!(board.propagate().is_changed());
        assert_eq!(board.cell(cells[1]).value(), 7);
    }

    #[test]
    fn test_even_length_pairs_share_total() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..4).map(|col| cu.cell(0, col)).collect();
        let constraint = ZipperLineConstraint::new(cells.clone()).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 1);
        // The outer pair totals 3, but the inner pair can no longer reach
        // 3 without 1 and 2; enforcement catches the clash.
        assert!(board.set_as_given(cells[3], 2).is_invalid());
    }
}
