//! Contains the [`SandwichSumConstraint`] struct.

use crate::fixed_sum_constraint::FixedSumConstraint;
use crate::or_constraint::OrConstraint;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a sandwich sum: within one full row or column, the
/// cells strictly between the 1 and the N sum to the clue.
///
/// Where the crusts sit is the case split; initialization builds an
/// [`OrConstraint`] with one subboard per feasible crust placement, each
/// pinning the crusts and carrying a [`FixedSumConstraint`] over the
/// filling.
pub struct SandwichSumConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    sum: usize,
}

impl SandwichSumConstraint {
    pub fn new(size: usize, cells: Vec<CellIndex>, sum: usize) -> Result<Self, String> {
        if cells.len() != size {
            return Err("a sandwich clue needs a full row or column".to_owned());
        }
        let cu = CellUtility::new(size);
        let specific_name = format!("Sandwich {} at {}", sum, cu.compact_name(&cells));
        Ok(Self { specific_name, cells, sum })
    }
}

impl Constraint for SandwichSumConstraint {
    fn name(&self) -> &str {
        "Sandwich Sum"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let size = board.size();
        let low = ValueMask::from_value(1);
        let high = ValueMask::from_value(size);

        let mut subboards = Vec::new();
        for i in 0..self.cells.len() {
            for j in 0..self.cells.len() {
                if i == j {
                    continue;
                }
                let (first, second) = (i.min(j), i.max(j));
                let filling = &self.cells[first + 1..second];

                // The filling draws distinct values from 2..=size-1; its
                // value range must be able to hit the clue.
                let len = filling.len();
                let fill_min: usize = (2..2 + len).sum();
                let fill_max: usize = (size - len..size).sum();
                if self.sum < fill_min || self.sum > fill_max {
                    continue;
                }

                let mut sub = board.subboard_clone();
                if sub.keep_cell_mask(self.cells[i], low).is_invalid()
                    || sub.keep_cell_mask(self.cells[j], high).is_invalid()
                {
                    continue;
                }
                if !filling.is_empty() {
                    let fixed =
                        FixedSumConstraint::with_name(&mut sub, &self.specific_name, filling, self.sum);
                    sub.add_constraint(Arc::new(fixed));
                } else if self.sum != 0 {
                    continue;
                }
                subboards.push(sub);
            }
        }

        if subboards.is_empty() {
            return InitResult::invalid();
        }
        let or = OrConstraint::new(board, &self.specific_name, subboards);
        InitResult::unchanged().with_constraints(vec![Arc::new(or)]).and_delete_self()
    }
}
