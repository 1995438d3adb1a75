//! Contains the [`OrConstraint`] struct: a disjunction over hypothetical
//! subboards.

use variant_solver_lib::prelude::*;

/// The surviving subboards, kept in the board's backtrackable state arena
/// so that cloning a board for search clones the hypothesis branches with
/// it. `active` distinguishes a live (possibly empty, hence invalid) list
/// from the placeholder left while a hook holds the state.
#[derive(Clone, Default)]
struct OrState {
    active: bool,
    subboards: Vec<Board>,
}

/// A [`Constraint`] holding an ordered list of child boards, each encoding
/// one case of a split too rich for weak links (sandwich crusts, X-sum
/// lengths, between-line orientations, pill-digit arrows).
///
/// The parent's masks, weak links, and regions flow down into every child;
/// each child runs to its own fixpoint; children that turn invalid are
/// dropped; and anything false in *every* surviving child is lifted back up
/// to the parent. The disjunction itself fails only when no child remains.
pub struct OrConstraint {
    specific_name: String,
    watch_cells: Vec<CellIndex>,
    state_key: StateKey<OrState>,
}

impl OrConstraint {
    /// Creates the constraint and registers the subboards as board state.
    pub fn new(board: &mut Board, specific_name: &str, subboards: Vec<Board>) -> Self {
        let watch_cells: Vec<CellIndex> = board.all_cells().collect();
        let state_key = board.register_state(OrState { active: true, subboards });
        Self { specific_name: specific_name.to_owned(), watch_cells, state_key }
    }

    /// Copies the parent's current masks, any weak links the child lacks,
    /// and any regions the child lacks, down into the child.
    fn sync_down(parent: &Board, sub: &mut Board) -> LogicResult {
        let mut result = LogicResult::None;

        for cell in parent.all_cells() {
            result = result.combine(sub.keep_cell_mask(cell, parent.cell(cell)));
            if result.is_invalid() {
                return result;
            }
        }

        let parent_graph = parent.link_graph();
        let sub_graph = sub.link_graph();
        let cu = parent.cell_utility();
        for index in 0..parent.num_candidates() {
            let candidate = cu.candidate_index(index);
            let mut missing = parent_graph.row(candidate).clone();
            missing.subtract(sub_graph.row(candidate));
            for other in missing.links() {
                result = result.combine(sub.add_weak_link(candidate, other));
                if result.is_invalid() {
                    return result;
                }
            }
        }

        for region in parent.regions() {
            result = result.combine(sub.add_region(region.clone()));
            if result.is_invalid() {
                return result;
            }
        }

        result
    }

    /// Syncs, initializes, and propagates every subboard, dropping the
    /// ones that fail.
    fn settle_subboards(&self, parent: &Board, state: &mut OrState) {
        state.subboards.retain_mut(|sub| {
            if Self::sync_down(parent, sub).is_invalid() {
                return false;
            }
            if !sub.constraints_finalized() && sub.finalize_constraints().is_err() {
                return false;
            }
            !sub.propagate().is_invalid()
        });
    }

    /// Candidates possible in the parent but in none of the subboards.
    fn shared_eliminations(&self, parent: &Board, state: &OrState) -> Vec<CandidateIndex> {
        let mut eliminations = Vec::new();
        for cell in parent.all_cells() {
            for value in parent.cell(cell) {
                if state.subboards.iter().all(|sub| !sub.cell(cell).has(value)) {
                    eliminations.push(cell.candidate(value));
                }
            }
        }
        eliminations
    }
}

impl Constraint for OrConstraint {
    fn name(&self) -> &str {
        "Or"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.watch_cells
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let mut state = board.take_state(self.state_key);
        self.settle_subboards(board, &mut state);
        if state.subboards.is_empty() {
            return InitResult::invalid();
        }

        // Lift shared eliminations into the parent.
        let mut result = LogicResult::None;
        for candidate in self.shared_eliminations(board, &state) {
            result = result.combine(board.clear_candidate(candidate));
            if result.is_invalid() {
                board.put_state(self.state_key, state);
                return InitResult::invalid();
            }
        }

        // Lift weak links common to every subboard.
        let parent_graph = board.link_graph();
        let cu = board.cell_utility();
        for index in 0..board.num_candidates() {
            let candidate = cu.candidate_index(index);
            let mut common = state.subboards[0].links_for(candidate).clone();
            for sub in &state.subboards[1..] {
                common.intersect(sub.links_for(candidate));
            }
            common.subtract(parent_graph.row(candidate));
            for other in common.links() {
                result = result.combine(board.add_weak_link(candidate, other));
                if result.is_invalid() {
                    board.put_state(self.state_key, state);
                    return InitResult::invalid();
                }
            }
        }

        state.active = true;
        board.put_state(self.state_key, state);
        InitResult::from(result)
    }

    fn enforce(&self, board: &mut Board, cell: CellIndex, value: usize) -> bool {
        let mut state = board.take_state(self.state_key);
        if !state.active {
            board.put_state(self.state_key, state);
            return true;
        }
        state.subboards.retain_mut(|sub| !sub.set_as_given(cell, value).is_invalid());
        let ok = !state.subboards.is_empty();
        state.active = true;
        board.put_state(self.state_key, state);
        ok
    }

    fn enforce_candidate_elim(&self, board: &mut Board, cell: CellIndex, value: usize) -> bool {
        let mut state = board.take_state(self.state_key);
        if !state.active {
            board.put_state(self.state_key, state);
            return true;
        }
        state
            .subboards
            .retain_mut(|sub| !sub.clear_cell_mask(cell, ValueMask::from_value(value)).is_invalid());
        let ok = !state.subboards.is_empty();
        state.active = true;
        board.put_state(self.state_key, state);
        ok
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let mut state = board.take_state(self.state_key);
        if !state.active {
            board.put_state(self.state_key, state);
            return Vec::new();
        }

        self.settle_subboards(board, &mut state);
        if state.subboards.is_empty() {
            state.active = true;
            board.put_state(self.state_key, state);
            return vec![Deduction::Invalid(format!(
                "every case of {} is impossible",
                self.specific_name
            ))];
        }

        let eliminations = self.shared_eliminations(board, &state);
        state.active = true;
        board.put_state(self.state_key, state);
        if eliminations.is_empty() {
            Vec::new()
        } else {
            vec![Deduction::Eliminations(eliminations)]
        }
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
