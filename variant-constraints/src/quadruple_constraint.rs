//! Contains the [`QuadrupleConstraint`] struct.

use crate::cardinality_constraint::CardinalityConstraint;
use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a quadruple clue: every listed value must appear
/// among the circled cells, as many times as it is listed.
///
/// Initialization hands one [`CardinalityConstraint`] per distinct clued
/// value to the board and removes itself.
pub struct QuadrupleConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    values: Vec<usize>,
}

impl QuadrupleConstraint {
    pub fn new(size: usize, cells: Vec<CellIndex>, values: Vec<usize>) -> Result<Self, String> {
        let cu = CellUtility::new(size);
        let specific_name = format!("Quadruple at {}", cu.compact_name(&cells));
        if cells.is_empty() {
            return Err(format!("{}: no cells", specific_name));
        }
        if values.is_empty() || values.len() > cells.len() {
            return Err(format!("{}: needs 1..{} values", specific_name, cells.len()));
        }
        if values.iter().any(|&v| v < 1 || v > size) {
            return Err(format!("{}: value out of range", specific_name));
        }
        Ok(Self { specific_name, cells, values })
    }
}

impl Constraint for QuadrupleConstraint {
    fn name(&self) -> &str {
        "Quadruple"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let mut add: Vec<Arc<dyn Constraint>> = Vec::new();
        for (value, copies) in self.values.iter().copied().counts().into_iter().sorted() {
            let candidates: Vec<CandidateIndex> =
                self.cells.iter().map(|&cell| cell.candidate(value)).collect();
            let allowed_counts: Vec<usize> = (copies..=self.cells.len()).collect();
            let name = format!("{}: {} of value {}", self.specific_name, copies, value);
            match CardinalityConstraint::new(board, &name, candidates, allowed_counts) {
                Ok(cardinality) => add.push(Arc::new(cardinality)),
                Err(_) => return InitResult::invalid(),
            }
        }
        InitResult::unchanged().with_constraints(add).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn corner_cells(cu: CellUtility) -> Vec<CellIndex> {
        vec![cu.cell(0, 0), cu.cell(0, 1), cu.cell(1, 0), cu.cell(1, 1)]
    }

    #[test]
    fn test_required_value_forced_when_cornered() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = corner_cells(cu);
        let quad = QuadrupleConstraint::new(9, cells.clone(), vec![7]).unwrap();
        board.add_constraint(Arc::new(quad));
        board.finalize_constraints().unwrap();
        // Knock 7 out of three of the four cells: the last must hold it.
        for &cell in &cells[..3] {
            board.clear_cell_mask(cell, ValueMask::from_value(7));
        }
        assert!(board.logical_step_constraints().is_changed());
        assert_eq!(board.cell(cells[3]).value(), 7);
    }

    #[test]
    fn test_doubled_value_spreads() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = corner_cells(cu);
        // 5 listed twice: the quad needs two 5s, one per row.
        let quad = QuadrupleConstraint::new(9, cells.clone(), vec![5, 5]).unwrap();
        board.add_constraint(Arc::new(quad));
        board.finalize_constraints().unwrap();
        // Remove 5 from the row-1 cells: only r2c1/r2c2 remain, and they
        // share a row, so two 5s cannot fit. The count still looks
        // reachable to the hooks; forcing both singles exposes the clash.
        board.clear_cell_mask(cells[0], ValueMask::from_value(5));
        board.clear_cell_mask(cells[1], ValueMask::from_value(5));
        assert!(board.logical_step_constraints().is_invalid());
    }

    #[test]
    fn test_too_many_values_rejected() {
        let cu = CellUtility::new(9);
        let cells = corner_cells(cu);
        assert!(QuadrupleConstraint::new(9, cells, vec![1, 2, 3, 4, 5]).is_err());
    }
}
