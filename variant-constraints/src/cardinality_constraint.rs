//! Contains the [`CardinalityConstraint`] struct: a generic "how many of
//! these candidates end up true" rule.

use itertools::Itertools;
use variant_solver_lib::prelude::*;

/// Per-solve progress, kept in the board's backtrackable state arena.
#[derive(Debug, Clone, Default)]
struct CardinalityState {
    satisfied: usize,
    remaining: Vec<CandidateIndex>,
}

/// A [`Constraint`] requiring that, among a fixed candidate set, the number
/// placed as true lies in an allowed count set.
///
/// Quadruples, the at-most/at-least halves of several line rules, and
/// ad-hoc count clauses all funnel through this. The trivial shapes (max
/// count 0 or 1) are encoded as weak links during initialization; the rest
/// track progress through the enforce hooks and deduce at the boundaries.
pub struct CardinalityConstraint {
    specific_name: String,
    candidates: Vec<CandidateIndex>,
    allowed_counts: Vec<usize>,
    watch_cells: Vec<CellIndex>,
    state_key: StateKey<CardinalityState>,
}

impl CardinalityConstraint {
    /// Creates the constraint and registers its state slot. Duplicate
    /// candidates are rejected as an encoding error.
    pub fn new(
        board: &mut Board,
        specific_name: &str,
        candidates: Vec<CandidateIndex>,
        allowed_counts: Vec<usize>,
    ) -> Result<Self, String> {
        let deduped: Vec<CandidateIndex> = candidates.iter().copied().sorted().dedup().collect();
        if deduped.len() != candidates.len() {
            return Err(format!("{}: duplicate candidates are not allowed", specific_name));
        }
        let allowed_counts: Vec<usize> = allowed_counts.into_iter().sorted().dedup().collect();
        if allowed_counts.is_empty() {
            return Err(format!("{}: no allowed counts", specific_name));
        }
        let watch_cells: Vec<CellIndex> =
            deduped.iter().map(|c| c.cell()).sorted().dedup().collect();
        let state_key = board.register_state(CardinalityState::default());
        Ok(Self {
            specific_name: specific_name.to_owned(),
            candidates: deduped,
            allowed_counts,
            watch_cells,
            state_key,
        })
    }

    fn max_allowed(&self) -> usize {
        *self.allowed_counts.last().unwrap()
    }

    /// The smallest allowed count still reachable from `satisfied`.
    fn min_attainable(&self, satisfied: usize) -> Option<usize> {
        self.allowed_counts.iter().copied().find(|&c| c >= satisfied)
    }

    fn recompute(&self, board: &Board) -> CardinalityState {
        let mut state = CardinalityState::default();
        for &candidate in &self.candidates {
            let (cell, value) = candidate.cell_and_value();
            let mask = board.cell(cell);
            if mask.is_given() && mask.value() == value {
                state.satisfied += 1;
            } else if mask.has(value) {
                state.remaining.push(candidate);
            }
        }
        state
    }
}

impl Constraint for CardinalityConstraint {
    fn name(&self) -> &str {
        "Cardinality"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.watch_cells
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let state = self.recompute(board);

        if self.candidates.is_empty() {
            return if self.allowed_counts.contains(&0) {
                InitResult::unchanged().and_delete_self()
            } else {
                InitResult::invalid()
            };
        }

        // Reachable counts must meet the allowed set.
        let reachable_max = state.satisfied + state.remaining.len();
        if !self.allowed_counts.iter().any(|&c| c >= state.satisfied && c <= reachable_max) {
            return InitResult::invalid();
        }

        // max 0: none of the candidates may be true.
        if self.max_allowed() == 0 {
            let mut result = LogicResult::None;
            for &candidate in &self.candidates {
                result = result.combine(board.add_weak_link(candidate, candidate));
                if result.is_invalid() {
                    return InitResult::invalid();
                }
            }
            return InitResult::from(result).and_delete_self();
        }

        // max 1: pairwise weak links say "at most one". With 0 also
        // allowed, the links carry the whole rule.
        if self.max_allowed() == 1 {
            let mut result = LogicResult::None;
            for (&a, &b) in self.candidates.iter().tuple_combinations() {
                result = result.combine(board.add_weak_link(a, b));
                if result.is_invalid() {
                    return InitResult::invalid();
                }
            }
            board.put_state(self.state_key, self.recompute(board));
            return if self.allowed_counts.contains(&0) {
                InitResult::from(result).and_delete_self()
            } else {
                InitResult::from(result)
            };
        }

        board.put_state(self.state_key, state);
        InitResult::unchanged()
    }

    fn enforce(&self, board: &mut Board, cell: CellIndex, value: usize) -> bool {
        let candidate = cell.candidate(value);
        if self.candidates.binary_search(&candidate).is_err() {
            return true;
        }
        let state = board.state_mut(self.state_key);
        state.satisfied += 1;
        state.remaining.retain(|&c| c != candidate);
        state.satisfied <= self.max_allowed()
    }

    fn enforce_candidate_elim(&self, board: &mut Board, cell: CellIndex, value: usize) -> bool {
        let candidate = cell.candidate(value);
        if self.candidates.binary_search(&candidate).is_err() {
            return true;
        }
        let state = board.state_mut(self.state_key);
        state.remaining.retain(|&c| c != candidate);
        let (satisfied, remaining) = (state.satisfied, state.remaining.len());
        match self.min_attainable(satisfied) {
            Some(min) => satisfied + remaining >= min,
            None => false,
        }
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let state = board.state(self.state_key).clone();
        let min_possible = state.satisfied;
        let max_possible = state.satisfied + state.remaining.len();
        let attainable: Vec<usize> = self
            .allowed_counts
            .iter()
            .copied()
            .filter(|&c| c >= min_possible && c <= max_possible)
            .collect();

        if attainable.is_empty() {
            return vec![Deduction::Invalid(format!(
                "{} can reach {}..{} true candidates but none of those counts is allowed",
                self.specific_name, min_possible, max_possible
            ))];
        }
        if state.remaining.is_empty() {
            return Vec::new();
        }

        // Low boundary: the count is already at the largest attainable
        // allowed value, so every remaining candidate is false.
        if min_possible == *attainable.last().unwrap() {
            return vec![Deduction::Eliminations(state.remaining)];
        }

        // High boundary: even taking every remaining candidate only just
        // reaches the smallest attainable allowed value, so all are true.
        if max_possible == *attainable.first().unwrap() {
            return vec![Deduction::Singles(state.remaining)];
        }

        // At least one more of the remaining candidates must become true:
        // anything weak-linked to all of them dies (clause forcing).
        if min_possible < *attainable.first().unwrap() {
            let mut common: Option<CandidateLinks> = None;
            for &candidate in &state.remaining {
                let row = board.links_for(candidate).clone();
                common = Some(match common {
                    None => row,
                    Some(mut acc) => {
                        acc.intersect(&row);
                        acc
                    }
                });
            }
            if let Some(common) = common {
                let eliminations: Vec<CandidateIndex> =
                    common.links().filter(|&c| board.has_candidate(c)).collect();
                if !eliminations.is_empty() {
                    return vec![Deduction::Eliminations(eliminations)];
                }
            }
        }

        Vec::new()
    }

    fn brute_force_step(&self, board: &mut Board) -> LogicResult {
        let mut result = LogicResult::None;
        for deduction in self.logical_step(board) {
            result = result.combine(board.apply_deduction(&deduction));
            if !result.is_none() {
                return result;
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_at_most_one_becomes_links() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // At most one of 5r1c1, 5r5c5 (cells share no region).
        let candidates = vec![cu.cell(0, 0).candidate(5), cu.cell(4, 4).candidate(5)];
        let constraint =
            CardinalityConstraint::new(&mut board, "at most one 5", candidates.clone(), vec![0, 1])
                .unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.is_weak_link(candidates[0], candidates[1]));
        // Fully encoded, so the constraint removed itself.
        assert!(board.constraints().is_empty());
        board.set_as_given(cu.cell(0, 0), 5);
        assert!(!board.cell(cu.cell(4, 4)).has(5));
    }

    #[test]
    fn test_exactly_all_forces_singles() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Exactly two of: 7 in r1c1, 7 in r5c5.
        let candidates = vec![cu.cell(0, 0).candidate(7), cu.cell(4, 4).candidate(7)];
        let constraint =
            CardinalityConstraint::new(&mut board, "two sevens", candidates, vec![2]).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.logical_step_constraints().is_changed());
        assert_eq!(board.cell(cu.cell(0, 0)).value(), 7);
        assert_eq!(board.cell(cu.cell(4, 4)).value(), 7);
    }

    #[test]
    fn test_saturated_count_eliminates_rest() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let candidates = vec![
            cu.cell(0, 0).candidate(3),
            cu.cell(4, 4).candidate(3),
            cu.cell(8, 8).candidate(3),
        ];
        let constraint =
            CardinalityConstraint::new(&mut board, "one three", candidates, vec![1]).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        // max is 1, so pairwise links already exist; placing one 3
        // eliminates the others through them.
        board.set_as_given(cu.cell(0, 0), 3);
        assert!(!board.cell(cu.cell(4, 4)).has(3));
        assert!(!board.cell(cu.cell(8, 8)).has(3));
    }

    #[test]
    fn test_elimination_below_minimum_fails() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let candidates = vec![cu.cell(0, 0).candidate(2), cu.cell(4, 4).candidate(2)];
        let constraint =
            CardinalityConstraint::new(&mut board, "need both twos", candidates, vec![2]).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        // Removing one of the required candidates violates the minimum.
        assert!(board.clear_candidate(cu.cell(0, 0).candidate(2)).is_invalid());
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let candidate = cu.cell(0, 0).candidate(1);
        assert!(CardinalityConstraint::new(&mut board, "dup", vec![candidate, candidate], vec![1])
            .is_err());
    }
}
