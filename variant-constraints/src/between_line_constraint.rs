//! Contains the [`BetweenLineConstraint`] struct.

use crate::or_constraint::OrConstraint;
use crate::weak_links_constraint::WeakLinksConstraint;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a between line: every cell on the line lies
/// strictly between the values of the two circled ends.
///
/// Which end is the low one is a genuine case split, so initialization
/// builds an [`OrConstraint`] over the two orderings; within one ordering
/// everything is pairwise and becomes weak links.
pub struct BetweenLineConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
}

impl BetweenLineConstraint {
    pub fn new(cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() < 3 {
            return Err("a between line needs a cell between its ends".to_owned());
        }
        let specific_name = format!("Between Line at {}", cells[0]);
        Ok(Self { specific_name, cells })
    }

    fn ordering_pairs(
        &self,
        low: CellIndex,
        high: CellIndex,
        size: usize,
    ) -> Vec<(CandidateIndex, CandidateIndex)> {
        let mut pairs = lt_pairs(low, high, 2, size);
        for &cell in &self.cells[1..self.cells.len() - 1] {
            pairs.extend(lt_pairs(low, cell, 1, size));
            pairs.extend(lt_pairs(cell, high, 1, size));
        }
        pairs
    }
}

impl Constraint for BetweenLineConstraint {
    fn name(&self) -> &str {
        "Between Line"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let size = board.size();
        let first = self.cells[0];
        let last = *self.cells.last().unwrap();

        let mut subboards = Vec::new();
        for (low, high) in [(first, last), (last, first)] {
            let mut sub = board.subboard_clone();
            let links =
                WeakLinksConstraint::new(&self.specific_name, self.ordering_pairs(low, high, size));
            sub.add_constraint(Arc::new(links));
            subboards.push(sub);
        }

        let or = OrConstraint::new(board, &self.specific_name, subboards);
        InitResult::unchanged().with_constraints(vec![Arc::new(or)]).and_delete_self()
    }
}
