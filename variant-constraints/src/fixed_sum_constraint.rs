//! Contains the [`FixedSumConstraint`] struct: a cell group with a known
//! total.

use variant_solver_lib::prelude::*;

/// The sum helper is built once the region table is complete, so it lives
/// in a state slot filled during `finalize`.
#[derive(Clone, Default)]
struct HelperSlot(Option<SumCellsHelper>);

/// A [`Constraint`] requiring the cells to total an exact sum. Killer
/// cages, little killers, and the cases of sandwich/X-sum subboards all
/// bottom out here.
///
/// One cell becomes a direct restriction, two cells become weak links, and
/// larger groups lean on [`SumCellsHelper`].
pub struct FixedSumConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    sum: usize,
    state_key: StateKey<HelperSlot>,
}

impl FixedSumConstraint {
    pub fn new(board: &mut Board, cells: &[CellIndex], sum: usize) -> Self {
        let cu = CellUtility::new(board.size());
        let specific_name = format!("Sum {} at {}", sum, cu.compact_name(cells));
        let state_key = board.register_state(HelperSlot::default());
        Self { specific_name, cells: cells.to_vec(), sum, state_key }
    }

    pub fn with_name(board: &mut Board, specific_name: &str, cells: &[CellIndex], sum: usize) -> Self {
        let mut constraint = Self::new(board, cells, sum);
        constraint.specific_name = specific_name.to_owned();
        constraint
    }

    pub fn sum(&self) -> usize {
        self.sum
    }

    /// Weak links for a two-cell sum: every pair of values that does not
    /// hit the total is excluded, and values with no partner at all are
    /// eliminated outright.
    fn pair_links(&self, board: &mut Board) -> LogicResult {
        let size = board.size();
        let (a, b) = (self.cells[0], self.cells[1]);
        let exclusive = board.share_region(a, b);
        let mut result = LogicResult::None;

        for cell in [a, b] {
            for value in 1..=size {
                let has_partner = self.sum > value
                    && self.sum - value <= size
                    && !(exclusive && self.sum - value == value);
                if !has_partner {
                    let candidate = cell.candidate(value);
                    result = result.combine(board.add_weak_link(candidate, candidate));
                    if result.is_invalid() {
                        return result;
                    }
                }
            }
        }

        for va in 1..=size {
            for vb in 1..=size {
                if va + vb != self.sum {
                    result = result.combine(board.add_weak_link(a.candidate(va), b.candidate(vb)));
                    if result.is_invalid() {
                        return result;
                    }
                }
            }
        }
        result
    }

    /// Quick feasibility bound from the raw masks, ignoring distinctness.
    fn mask_sum_bounds(&self, board: &Board) -> (usize, usize) {
        let mut min = 0;
        let mut max = 0;
        for &cell in &self.cells {
            let mask = board.cell(cell);
            min += mask.min();
            max += mask.max();
        }
        (min, max)
    }
}

impl Constraint for FixedSumConstraint {
    fn name(&self) -> &str {
        "Fixed Sum"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    fn init(&self, board: &mut Board) -> InitResult {
        match self.cells.len() {
            0 => InitResult::invalid(),
            1 => {
                if self.sum < 1 || self.sum > board.size() {
                    return InitResult::invalid();
                }
                let result = board.keep_cell_mask(self.cells[0], ValueMask::from_value(self.sum));
                if result.is_invalid() {
                    return InitResult::invalid();
                }
                InitResult::from(result).and_delete_self()
            }
            2 => {
                let result = self.pair_links(board);
                if result.is_invalid() {
                    return InitResult::invalid();
                }
                InitResult::from(result).and_delete_self()
            }
            _ => InitResult::unchanged(),
        }
    }

    fn finalize(&self, board: &mut Board) -> InitResult {
        let helper = SumCellsHelper::new(board, &self.cells);
        match helper.sum_range(board) {
            Some((min, max)) if min <= self.sum && self.sum <= max => {}
            _ => return InitResult::invalid(),
        }
        board.put_state(self.state_key, HelperSlot(Some(helper)));
        InitResult::unchanged()
    }

    fn enforce(&self, board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        let (min, max) = self.mask_sum_bounds(board);
        min <= self.sum && self.sum <= max
    }

    fn enforce_candidate_elim(&self, board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        let (min, max) = self.mask_sum_bounds(board);
        min <= self.sum && self.sum <= max
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let helper = match &board.state(self.state_key).0 {
            Some(helper) => helper.clone(),
            None => return Vec::new(),
        };

        // Probe on a clone (sharing the memo store), then report the
        // direct shrinkage as eliminations.
        let mut probe = board.clone();
        match helper.restrict_sums(&mut probe, &[self.sum]) {
            LogicResult::Invalid => vec![Deduction::Invalid(format!(
                "{} cannot reach its total",
                self.specific_name
            ))],
            LogicResult::None => Vec::new(),
            LogicResult::Changed => {
                let mut eliminations = Vec::new();
                for &cell in &self.cells {
                    let removed = board.cell(cell).value_bits() & !probe.cell(cell).value_bits();
                    for value in ValueMask::from(removed) {
                        eliminations.push(cell.candidate(value));
                    }
                }
                if eliminations.is_empty() {
                    Vec::new()
                } else {
                    vec![Deduction::Eliminations(eliminations)]
                }
            }
        }
    }

    fn brute_force_step(&self, board: &mut Board) -> LogicResult {
        let helper = match &board.state(self.state_key).0 {
            Some(helper) => helper.clone(),
            None => return LogicResult::None,
        };
        helper.restrict_sums(board, &[self.sum])
    }
}
