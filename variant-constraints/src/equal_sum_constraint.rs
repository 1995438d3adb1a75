//! Contains the [`EqualSumConstraint`] struct: several cell groups sharing
//! one unknown total.

use crate::fixed_sum_constraint::FixedSumConstraint;
use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// One summand set: a cell list plus a constant offset added to its total.
#[derive(Debug, Clone)]
pub struct SumSet {
    pub cells: Vec<CellIndex>,
    pub offset: usize,
}

impl SumSet {
    pub fn new(cells: Vec<CellIndex>) -> Self {
        Self { cells, offset: 0 }
    }

    pub fn with_offset(cells: Vec<CellIndex>, offset: usize) -> Self {
        Self { cells, offset }
    }
}

/// Helpers are built once the region table is complete.
#[derive(Clone, Default)]
struct HelperSlot(Vec<SumCellsHelper>);

/// A [`Constraint`] requiring every set to reach the same (unclued) total.
/// Arrows, double arrows, zipper lines, and region-sum lines reduce to
/// this.
///
/// A set with no cells pins the shared total to its offset, and the whole
/// constraint rewrites itself into independent [`FixedSumConstraint`]s.
pub struct EqualSumConstraint {
    specific_name: String,
    sets: Vec<SumSet>,
    watch_cells: Vec<CellIndex>,
    state_key: StateKey<HelperSlot>,
}

impl EqualSumConstraint {
    pub fn new(board: &mut Board, specific_name: &str, sets: Vec<SumSet>) -> Self {
        let watch_cells: Vec<CellIndex> =
            sets.iter().flat_map(|set| set.cells.iter().copied()).sorted().dedup().collect();
        let state_key = board.register_state(HelperSlot::default());
        Self { specific_name: specific_name.to_owned(), sets, watch_cells, state_key }
    }

    /// The totals every set can still reach, intersected across sets.
    fn common_sums(&self, board: &Board, helpers: &[SumCellsHelper]) -> Option<Vec<usize>> {
        let mut common: Option<Vec<usize>> = None;
        for (set, helper) in self.sets.iter().zip(helpers) {
            let sums: Vec<usize> =
                helper.possible_sums(board)?.into_iter().map(|s| s + set.offset).collect();
            common = Some(match common {
                None => sums,
                Some(prev) => prev.into_iter().filter(|s| sums.contains(s)).collect(),
            });
        }
        common
    }
}

impl Constraint for EqualSumConstraint {
    fn name(&self) -> &str {
        "Equal Sum"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.watch_cells
    }

    fn init(&self, board: &mut Board) -> InitResult {
        if self.sets.len() < 2 {
            return InitResult::unchanged().and_delete_self();
        }

        // An empty set fixes the total; the rest become fixed sums.
        if let Some(fixed) = self.sets.iter().find(|set| set.cells.is_empty()) {
            let total = fixed.offset;
            let mut add: Vec<Arc<dyn Constraint>> = Vec::new();
            for set in self.sets.iter().filter(|set| !set.cells.is_empty()) {
                if total < set.offset {
                    return InitResult::invalid();
                }
                add.push(Arc::new(FixedSumConstraint::with_name(
                    board,
                    &self.specific_name,
                    &set.cells,
                    total - set.offset,
                )));
            }
            return InitResult::unchanged().with_constraints(add).and_delete_self();
        }

        InitResult::unchanged()
    }

    fn finalize(&self, board: &mut Board) -> InitResult {
        let helpers: Vec<SumCellsHelper> =
            self.sets.iter().map(|set| SumCellsHelper::new(board, &set.cells)).collect();
        match self.common_sums(board, &helpers) {
            Some(sums) if !sums.is_empty() => {}
            _ => return InitResult::invalid(),
        }
        board.put_state(self.state_key, HelperSlot(helpers));
        InitResult::unchanged()
    }

    fn enforce(&self, board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        // Cheap overlap test on mask bounds, ignoring distinctness.
        let mut low = 0usize;
        let mut high = usize::MAX;
        for set in &self.sets {
            let mut min = set.offset;
            let mut max = set.offset;
            for &cell in &set.cells {
                let mask = board.cell(cell);
                min += mask.min();
                max += mask.max();
            }
            low = low.max(min);
            high = high.min(max);
        }
        low <= high
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let helpers = board.state(self.state_key).0.clone();
        if helpers.is_empty() {
            return Vec::new();
        }

        let common = match self.common_sums(board, &helpers) {
            Some(sums) if !sums.is_empty() => sums,
            _ => {
                return vec![Deduction::Invalid(format!(
                    "the sets of {} share no attainable total",
                    self.specific_name
                ))]
            }
        };

        let mut probe = board.clone();
        let mut eliminations = Vec::new();
        for (set, helper) in self.sets.iter().zip(&helpers) {
            let targets: Vec<usize> =
                common.iter().filter(|&&s| s >= set.offset).map(|&s| s - set.offset).collect();
            match helper.restrict_sums(&mut probe, &targets) {
                LogicResult::Invalid => {
                    return vec![Deduction::Invalid(format!(
                        "a set of {} cannot reach the shared total",
                        self.specific_name
                    ))]
                }
                _ => {
                    for &cell in &set.cells {
                        let removed = board.cell(cell).value_bits() & !probe.cell(cell).value_bits();
                        for value in ValueMask::from(removed) {
                            eliminations.push(cell.candidate(value));
                        }
                    }
                }
            }
        }

        if eliminations.is_empty() {
            Vec::new()
        } else {
            vec![Deduction::Eliminations(eliminations)]
        }
    }

    fn brute_force_step(&self, board: &mut Board) -> LogicResult {
        let helpers = board.state(self.state_key).0.clone();
        if helpers.is_empty() {
            return LogicResult::None;
        }
        let common = match self.common_sums(board, &helpers) {
            Some(sums) if !sums.is_empty() => sums,
            _ => return LogicResult::Invalid,
        };
        let mut result = LogicResult::None;
        for (set, helper) in self.sets.iter().zip(&helpers) {
            let targets: Vec<usize> =
                common.iter().filter(|&&s| s >= set.offset).map(|&s| s - set.offset).collect();
            result = result.combine(helper.restrict_sums(board, &targets));
            if result.is_invalid() {
                return result;
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_offset_set_becomes_fixed_sums() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..2).map(|col| cu.cell(0, col)).collect();
        let sets = vec![SumSet::with_offset(Vec::new(), 5), SumSet::new(cells.clone())];
        let constraint = EqualSumConstraint::new(&mut board, "fixed total 5", sets);
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        // Rewritten into a pair fixed sum of 5.
        assert_eq!(board.cell(cells[0]), ValueMask::from_values(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_common_total_restricts_both_sets() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // Set A: one cell. Set B: three cells in the same row.
        let a = vec![cu.cell(4, 4)];
        let b: Vec<CellIndex> = (0..3).map(|col| cu.cell(0, col)).collect();
        let constraint = EqualSumConstraint::new(
            &mut board,
            "cell equals row triple",
            vec![SumSet::new(a.clone()), SumSet::new(b.clone())],
        );
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // The triple sums to 6..9 at most when matched against one digit.
        assert_eq!(board.cell(a[0]), ValueMask::from_values(&[6, 7, 8, 9]));
    }

    #[test]
    fn test_disjoint_sums_invalid() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // One digit (1..9) can never equal a full row (45).
        let a = vec![cu.cell(4, 4)];
        let b: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        let constraint = EqualSumConstraint::new(
            &mut board,
            "digit equals full row",
            vec![SumSet::new(a), SumSet::new(b)],
        );
        board.add_constraint(Arc::new(constraint));
        assert!(board.finalize_constraints().is_err());
    }
}
