//! Contains the [`WeakLinksConstraint`] struct for installing a precomputed
//! list of candidate exclusions.

use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] that adds a fixed list of weak links during
/// initialization and then removes itself.
///
/// A pair linking a candidate to itself eliminates that candidate. Many
/// line- and pair-style rules reduce entirely to an instance of this.
#[derive(Debug)]
pub struct WeakLinksConstraint {
    specific_name: String,
    pairs: Vec<(CandidateIndex, CandidateIndex)>,
}

impl WeakLinksConstraint {
    pub fn new(specific_name: &str, pairs: Vec<(CandidateIndex, CandidateIndex)>) -> Self {
        Self { specific_name: specific_name.to_owned(), pairs }
    }

    /// Convenience wrapper returning the trait object the board expects.
    pub fn into_arc(self) -> Arc<dyn Constraint> {
        Arc::new(self)
    }
}

impl Constraint for WeakLinksConstraint {
    fn name(&self) -> &str {
        "Weak Links"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let mut result = LogicResult::None;
        for &(a, b) in &self.pairs {
            result = result.combine(board.add_weak_link(a, b));
            if result.is_invalid() {
                return InitResult::invalid();
            }
        }
        InitResult::from(result).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_links_installed_and_self_deleted() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let a = cu.cell(0, 0).candidate(1);
        let b = cu.cell(4, 4).candidate(2);
        board.add_constraint(WeakLinksConstraint::new("test links", vec![(a, b)]).into_arc());
        board.finalize_constraints().unwrap();
        assert!(board.is_weak_link(a, b));
        assert!(board.constraints().is_empty());
    }

    #[test]
    fn test_self_pair_eliminates() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let a = cu.cell(0, 0).candidate(1);
        board.add_constraint(WeakLinksConstraint::new("kill 1r1c1", vec![(a, a)]).into_arc());
        board.finalize_constraints().unwrap();
        assert!(!board.has_candidate(a));
    }
}
