//! Contains the [`ArrowConstraint`] struct.

use crate::equal_sum_constraint::{EqualSumConstraint, SumSet};
use crate::fixed_sum_constraint::FixedSumConstraint;
use crate::or_constraint::OrConstraint;
use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for an arrow: the circle total equals the shaft sum.
///
/// A one-cell circle reduces to an [`EqualSumConstraint`] between circle
/// and shaft. A multi-cell circle is a *pill* read as a decimal number;
/// that split is too rich for weak links, so it becomes an
/// [`OrConstraint`] with one subboard per feasible pill reading.
pub struct ArrowConstraint {
    specific_name: String,
    circle: Vec<CellIndex>,
    shaft: Vec<CellIndex>,
}

impl ArrowConstraint {
    pub fn new(circle: Vec<CellIndex>, shaft: Vec<CellIndex>) -> Result<Self, String> {
        if circle.is_empty() || shaft.is_empty() {
            return Err("an arrow needs both a circle and a shaft".to_owned());
        }
        let specific_name = format!("Arrow at {}", circle[0]);
        Ok(Self { specific_name, circle, shaft })
    }

    /// Every reading of the pill digits as a decimal total.
    fn pill_totals(&self, board: &Board) -> Vec<(Vec<usize>, usize)> {
        self.circle
            .iter()
            .map(|&cell| board.cell(cell).without_given().to_vec())
            .multi_cartesian_product()
            .map(|digits| {
                let total = digits.iter().fold(0, |acc, &d| acc * 10 + d);
                (digits, total)
            })
            .collect()
    }
}

impl Constraint for ArrowConstraint {
    fn name(&self) -> &str {
        "Arrow"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        if self.circle.len() == 1 {
            let equal = EqualSumConstraint::new(
                board,
                &self.specific_name,
                vec![SumSet::new(self.circle.clone()), SumSet::new(self.shaft.clone())],
            );
            return InitResult::unchanged()
                .with_constraints(vec![Arc::new(equal)])
                .and_delete_self();
        }

        // Pill circle: one subboard per feasible reading.
        let helper = SumCellsHelper::new(board, &self.shaft);
        let (shaft_min, shaft_max) = match helper.sum_range(board) {
            Some(range) => range,
            None => return InitResult::invalid(),
        };

        let mut subboards = Vec::new();
        for (digits, total) in self.pill_totals(board) {
            if total < shaft_min || total > shaft_max {
                continue;
            }
            let mut sub = board.subboard_clone();
            let mut feasible = true;
            for (&cell, &digit) in self.circle.iter().zip(&digits) {
                if sub.keep_cell_mask(cell, ValueMask::from_value(digit)).is_invalid() {
                    feasible = false;
                    break;
                }
            }
            if !feasible {
                continue;
            }
            let fixed = FixedSumConstraint::with_name(&mut sub, &self.specific_name, &self.shaft, total);
            sub.add_constraint(Arc::new(fixed));
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
    fn test_circle_bounds() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Circle r1c1, shaft r1c2..r1c4.
        let circle = vec![cu.cell(0, 0)];
        let shaft: Vec<CellIndex> = (1..4).map(|col| cu.cell(0, col)).collect();
        let arrow = ArrowConstraint::new(circle.clone(), shaft).unwrap();
        board.add_constraint(Arc::new(arrow));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // Three distinct shaft cells sum to at least 6, and the circle
        // caps the total at 9.
        assert_eq!(board.cell(circle[0]), ValueMask::from_values(&[6, 7, 8, 9]));
    }

    #[test]
    fn test_circle_value_drives_shaft() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let circle = vec![cu.cell(0, 0)];
        let shaft: Vec<CellIndex> = (1..3).map(|col| cu.cell(0, col)).collect();
        let arrow = ArrowConstraint::new(circle.clone(), shaft.clone()).unwrap();
        board.add_constraint(Arc::new(arrow));
        board.finalize_constraints().unwrap();
        board.set_as_given(circle[0], 3);
        assert!(board.propagate().is_changed());
        // 3 = 1 + 2 over two distinct cells.
        for &cell in &shaft {
            assert_eq!(board.cell(cell), ValueMask::from_values(&[1, 2]));
        }
    }

    #[test]
    fn test_pill_arrow() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Two-cell pill over a five-cell shaft: totals 10..45 feasible.
        let circle = vec![cu.cell(0, 0), cu.cell(0, 1)];
        let shaft: Vec<CellIndex> = (0..5).map(|i| cu.cell(2, i)).collect();
        let arrow = ArrowConstraint::new(circle.clone(), shaft).unwrap();
        board.add_constraint(Arc::new(arrow));
        board.finalize_constraints().unwrap();
        let _ = board.propagate();
        // Five distinct cells sum to 15..35, so the pill's tens digit
        // can only be 1, 2, or 3.
        let tens = board.cell(circle[0]);
        assert!(tens.has(1) && tens.has(2) && tens.has(3));
        assert!(!tens.has(4) && !tens.has(9));
    }

    #[test]
    fn test_empty_parts_rejected() {
        let cu = CellUtility::new(9);
        assert!(ArrowConstraint::new(vec![], vec![cu.cell(0, 0)]).is_err());
    }
}
