//! Contains [`Board`] which owns a puzzle's candidate state, weak-link
//! graph, regions, constraints, and memo/state stores.

use itertools::Itertools;

use crate::prelude::*;
use crate::state::StateArena;
use std::any::Any;
use std::sync::{Arc, Mutex};

/// The symmetric weak-link adjacency over all candidates.
///
/// Stored as one [`CandidateLinks`] row per candidate. The graph is
/// append-only; boards share it behind an `Arc` and copy-on-write on the
/// first mutation after a clone.
#[derive(Clone, Debug)]
pub struct LinkGraph {
    rows: Vec<CandidateLinks>,
    total: usize,
}

impl LinkGraph {
    pub fn new(size: usize) -> Self {
        let num_candidates = size * size * size;
        Self { rows: vec![CandidateLinks::new(size); num_candidates], total: 0 }
    }

    /// One adjacency row.
    pub fn row(&self, candidate: CandidateIndex) -> &CandidateLinks {
        &self.rows[candidate.index()]
    }

    pub fn is_linked(&self, a: CandidateIndex, b: CandidateIndex) -> bool {
        self.rows[a.index()].is_linked(b)
    }

    /// The number of directed links in the graph.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Inserts the symmetric link, returning true if the graph changed.
    fn insert(&mut self, a: CandidateIndex, b: CandidateIndex) -> bool {
        let mut changed = false;
        if self.rows[a.index()].set(b, true) {
            self.total += 1;
            changed = true;
        }
        if self.rows[b.index()].set(a, true) {
            self.total += 1;
            changed = true;
        }
        changed
    }
}

/// The mutable solving state of one puzzle (or one hypothetical branch of
/// one).
///
/// Cloning is cheap-ish by design: the link graph, region table, and memo
/// store are shared (copy-on-write where mutable), the constraint objects
/// are immutable and shared, and only the cell masks and the constraint
/// state arena are copied value-wise. Search backtracking therefore costs
/// the size of the state, not the number of constraints.
#[derive(Clone)]
pub struct Board {
    size: usize,
    all_values: ValueMask,
    cells: Vec<ValueMask>,
    given_count: usize,
    links: Arc<LinkGraph>,
    regions: Arc<Vec<Region>>,
    constraints: Vec<Arc<dyn Constraint>>,
    enforce_lookup: Arc<Vec<Vec<usize>>>,
    lookup_valid: bool,
    states: StateArena,
    memo: Arc<Mutex<MemoStore>>,
    constraints_finalized: bool,
    invalid_init: bool,
}

impl Board {
    /// Creates an empty board with standard row, column, and box regions.
    pub fn new(size: usize) -> Board {
        Self::with_boxes(size, &default_boxes(size))
    }

    /// Creates an empty board with row and column regions plus box regions
    /// taken from a flat cell-to-box assignment. Box groups that do not
    /// contain exactly `size` cells are skipped.
    pub fn with_boxes(size: usize, boxes: &[usize]) -> Board {
        let cu = CellUtility::new(size);
        let num_cells = size * size;
        let mut board = Board {
            size,
            all_values: ValueMask::from_all_values(size),
            cells: vec![ValueMask::from_all_values(size); num_cells],
            given_count: 0,
            links: Arc::new(LinkGraph::new(size)),
            regions: Arc::new(Vec::new()),
            constraints: Vec::new(),
            enforce_lookup: Arc::new(vec![Vec::new(); num_cells]),
            lookup_valid: false,
            states: StateArena::new(),
            memo: Arc::new(Mutex::new(MemoStore::new())),
            constraints_finalized: false,
            invalid_init: false,
        };

        for row in 0..size {
            let cells: Vec<CellIndex> = (0..size).map(|col| cu.cell(row, col)).collect();
            board.add_region(Region::new(&format!("Row {}", row + 1), &cells, RegionKind::Row));
        }
        for col in 0..size {
            let cells: Vec<CellIndex> = (0..size).map(|row| cu.cell(row, col)).collect();
            board.add_region(Region::new(&format!("Column {}", col + 1), &cells, RegionKind::Col));
        }

        if boxes.len() == num_cells {
            let mut cells_by_box: Vec<Vec<CellIndex>> = vec![Vec::new(); num_cells];
            for cell in cu.all_cells() {
                cells_by_box[boxes[cell.index()]].push(cell);
            }
            for (box_id, cells) in cells_by_box.iter().enumerate() {
                if cells.len() == size {
                    board.add_region(Region::new(&format!("Box {}", box_id + 1), cells, RegionKind::Box));
                }
            }
        }

        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.size * self.size
    }

    pub fn num_candidates(&self) -> usize {
        self.num_cells() * self.size
    }

    pub fn all_values(&self) -> ValueMask {
        self.all_values
    }

    pub fn cell_utility(&self) -> CellUtility {
        CellUtility::new(self.size)
    }

    pub fn all_cells(&self) -> impl Iterator<Item = CellIndex> {
        self.cell_utility().all_cells()
    }

    /// The current candidate mask of a cell.
    pub fn cell(&self, cell: CellIndex) -> ValueMask {
        self.cells[cell.index()]
    }

    pub fn has_candidate(&self, candidate: CandidateIndex) -> bool {
        let (cell, value) = candidate.cell_and_value();
        self.cell(cell).has(value)
    }

    /// The number of cells whose value is confirmed.
    pub fn given_count(&self) -> usize {
        self.given_count
    }

    pub fn is_solved(&self) -> bool {
        self.given_count == self.num_cells()
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    pub fn constraints_finalized(&self) -> bool {
        self.constraints_finalized
    }

    /// Sticky flag recording that a primitive mutation failed while
    /// constraints were still initializing.
    pub fn invalid_init(&self) -> bool {
        self.invalid_init
    }

    // ------------------------------------------------------------------
    // Weak links
    // ------------------------------------------------------------------

    pub fn is_weak_link(&self, a: CandidateIndex, b: CandidateIndex) -> bool {
        self.links.is_linked(a, b)
    }

    pub fn links_for(&self, candidate: CandidateIndex) -> &CandidateLinks {
        self.links.row(candidate)
    }

    /// A cheap shared snapshot of the link graph.
    pub fn link_graph(&self) -> Arc<LinkGraph> {
        self.links.clone()
    }

    pub fn total_weak_links(&self) -> usize {
        self.links.total()
    }

    /// Adds a symmetric weak link between two candidates.
    ///
    /// A self-link marks the candidate as impossible and eliminates it.
    /// When one endpoint is already placed as a given, the other endpoint
    /// is eliminated immediately.
    pub fn add_weak_link(&mut self, a: CandidateIndex, b: CandidateIndex) -> LogicResult {
        if a == b {
            let graph_changed = Arc::make_mut(&mut self.links).insert(a, b);
            let result = if self.has_candidate(a) {
                self.clear_candidate(a)
            } else {
                LogicResult::None
            };
            if result.is_invalid() {
                return result;
            }
            return if graph_changed { LogicResult::Changed.combine(result) } else { result };
        }

        if !Arc::make_mut(&mut self.links).insert(a, b) {
            return LogicResult::None;
        }

        // A link to an already-placed candidate fires right away.
        let mut result = LogicResult::Changed;
        for (placed, other) in [(a, b), (b, a)] {
            let (cell, value) = placed.cell_and_value();
            if self.cell(cell).is_given() && self.cell(cell).value() == value && self.has_candidate(other) {
                result = result.combine(self.clear_candidate(other));
                if result.is_invalid() {
                    return result;
                }
            }
        }
        result
    }

    // ------------------------------------------------------------------
    // Regions
    // ------------------------------------------------------------------

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Appends a region and adds the pairwise same-value weak links that
    /// encode its distinctness. Duplicate regions (same cell set and kind)
    /// are ignored.
    pub fn add_region(&mut self, region: Region) -> LogicResult {
        if self.regions.iter().any(|r| r.same_as(&region)) {
            return LogicResult::None;
        }

        let cells = region.cells().to_vec();
        Arc::make_mut(&mut self.regions).push(region);

        let mut result = LogicResult::Changed;
        for (&c1, &c2) in cells.iter().tuple_combinations() {
            for value in 1..=self.size {
                result = result.combine(self.add_weak_link(c1.candidate(value), c2.candidate(value)));
                if result.is_invalid() {
                    return result;
                }
            }
        }
        result
    }

    /// Whether two cells share at least one region (and so must differ).
    pub fn share_region(&self, a: CellIndex, b: CellIndex) -> bool {
        self.regions.iter().any(|r| r.contains(a) && r.contains(b))
    }

    /// Whether every pair of the cells shares some region.
    pub fn is_distinct_group(&self, cells: &[CellIndex]) -> bool {
        cells.iter().tuple_combinations().all(|(&a, &b)| self.share_region(a, b))
    }

    /// Partitions a cell list into the coarsest sequence of sub-lists such
    /// that each sub-list lies entirely within one region (and so holds
    /// mutually distinct values). Cells not co-regional with anything else
    /// become singleton groups.
    pub fn split_into_groups(&self, cells: &[CellIndex]) -> Vec<Vec<CellIndex>> {
        let mut remaining: Vec<CellIndex> = cells.iter().copied().sorted().dedup().collect();
        let mut groups = Vec::new();

        while !remaining.is_empty() {
            let best: Option<Vec<CellIndex>> = self
                .regions
                .iter()
                .map(|region| {
                    remaining.iter().copied().filter(|&cell| region.contains(cell)).collect::<Vec<_>>()
                })
                .filter(|overlap| overlap.len() >= 2)
                .max_by_key(|overlap| overlap.len());

            match best {
                Some(group) => {
                    remaining.retain(|cell| !group.contains(cell));
                    groups.push(group);
                }
                None => {
                    groups.extend(remaining.iter().map(|&cell| vec![cell]));
                    remaining.clear();
                }
            }
        }

        groups
    }

    // ------------------------------------------------------------------
    // Primitive mutations
    // ------------------------------------------------------------------

    fn mark_invalid(&mut self) {
        if !self.constraints_finalized {
            self.invalid_init = true;
        }
    }

    /// Intersects a cell's candidates with `mask` (the given bit is
    /// preserved). Cleared values fire `enforce_candidate_elim` on every
    /// constraint watching the cell, and a cell reduced to a single
    /// unconfirmed value is promoted to a given before this returns.
    pub fn keep_cell_mask(&mut self, cell: CellIndex, mask: ValueMask) -> LogicResult {
        let index = cell.index();
        let before = self.cells[index];
        let after_bits = before.value_bits() & mask.value_bits();
        if after_bits == before.value_bits() {
            return LogicResult::None;
        }

        let mut after = ValueMask::from(after_bits);
        if before.is_given() {
            after = after.as_given();
        }
        if after.is_empty() {
            self.mark_invalid();
            return LogicResult::Invalid;
        }
        self.cells[index] = after;

        let cleared = ValueMask::from(before.value_bits() & !after_bits);
        for value in cleared {
            if !self.dispatch_candidate_elim(cell, value) {
                self.mark_invalid();
                return LogicResult::Invalid;
            }
        }

        if after.is_single() && !after.is_given() {
            // Naked single: promote to a given, cascading to a fixpoint.
            if self.set_as_given(cell, after.value()).is_invalid() {
                return LogicResult::Invalid;
            }
        }

        LogicResult::Changed
    }

    /// Removes every value of `mask` from the cell.
    pub fn clear_cell_mask(&mut self, cell: CellIndex, mask: ValueMask) -> LogicResult {
        self.keep_cell_mask(cell, self.all_values & !mask)
    }

    /// Removes a single candidate.
    pub fn clear_candidate(&mut self, candidate: CandidateIndex) -> LogicResult {
        let (cell, value) = candidate.cell_and_value();
        self.clear_cell_mask(cell, ValueMask::from_value(value))
    }

    /// Confirms `value` in `cell`: the mask becomes the value plus the
    /// given bit, every weak-linked candidate is eliminated (cascading),
    /// and `enforce` fires on every constraint watching the cell.
    pub fn set_as_given(&mut self, cell: CellIndex, value: usize) -> LogicResult {
        let index = cell.index();
        let before = self.cells[index];
        if !before.has(value) {
            self.mark_invalid();
            return LogicResult::Invalid;
        }
        if before.is_given() {
            // Already confirmed; only a conflicting value is an error.
            return if before.value() == value {
                LogicResult::None
            } else {
                self.mark_invalid();
                LogicResult::Invalid
            };
        }

        self.cells[index] = ValueMask::from_value(value).as_given();
        self.given_count += 1;

        // The cell's other candidates are gone; report those eliminations.
        let removed = ValueMask::from(before.value_bits()).without(value);
        for other in removed {
            if !self.dispatch_candidate_elim(cell, other) {
                self.mark_invalid();
                return LogicResult::Invalid;
            }
        }

        // Propagate the weak links of the placed candidate.
        let graph = self.links.clone();
        for linked in graph.row(cell.candidate(value)).links() {
            if linked.cell() == cell {
                continue;
            }
            if self.has_candidate(linked) && self.clear_candidate(linked).is_invalid() {
                return LogicResult::Invalid;
            }
        }

        if !self.dispatch_enforce(cell, value) {
            self.mark_invalid();
            return LogicResult::Invalid;
        }

        LogicResult::Changed
    }

    // ------------------------------------------------------------------
    // Constraint dispatch
    // ------------------------------------------------------------------

    fn watchers(&self, cell: CellIndex) -> Vec<Arc<dyn Constraint>> {
        if self.lookup_valid {
            self.enforce_lookup[cell.index()].iter().map(|&i| self.constraints[i].clone()).collect()
        } else {
            self.constraints.iter().filter(|c| c.cells().contains(&cell)).cloned().collect()
        }
    }

    fn dispatch_enforce(&mut self, cell: CellIndex, value: usize) -> bool {
        for constraint in self.watchers(cell) {
            if !constraint.enforce(self, cell, value) {
                return false;
            }
        }
        true
    }

    fn dispatch_candidate_elim(&mut self, cell: CellIndex, value: usize) -> bool {
        for constraint in self.watchers(cell) {
            if !constraint.enforce_candidate_elim(self, cell, value) {
                return false;
            }
        }
        true
    }

    fn rebuild_enforce_lookup(&mut self) {
        let mut lookup = vec![Vec::new(); self.num_cells()];
        for (i, constraint) in self.constraints.iter().enumerate() {
            for cell in constraint.cells() {
                lookup[cell.index()].push(i);
            }
        }
        self.enforce_lookup = Arc::new(lookup);
        self.lookup_valid = true;
    }

    // ------------------------------------------------------------------
    // Constraint lifecycle
    // ------------------------------------------------------------------

    /// Attaches a constraint to the active list.
    pub fn add_constraint(&mut self, constraint: Arc<dyn Constraint>) {
        self.constraints.push(constraint);
        self.lookup_valid = false;
    }

    /// Runs every constraint's `init` repeatedly until a full pass reports
    /// no change, then runs the single `finalize` pass and freezes the
    /// constraint list for dispatch.
    pub fn finalize_constraints(&mut self) -> Result<(), String> {
        if self.invalid_init {
            return Err("the board was invalidated before initialization".to_owned());
        }
        loop {
            let mut changed = false;
            let mut idx = 0;
            while idx < self.constraints.len() {
                let constraint = self.constraints[idx].clone();
                let init = constraint.init(self);
                if init.result.is_invalid() || self.invalid_init {
                    return Err(format!(
                        "{} found the board invalid during initialization.",
                        constraint.specific_name()
                    ));
                }
                changed |= init.result.is_changed();
                for add in init.add_constraints {
                    self.constraints.push(add);
                    self.lookup_valid = false;
                    changed = true;
                }
                if init.delete_self {
                    self.constraints.remove(idx);
                    self.lookup_valid = false;
                } else {
                    idx += 1;
                }
            }
            if !changed {
                break;
            }
        }

        let mut idx = 0;
        while idx < self.constraints.len() {
            let constraint = self.constraints[idx].clone();
            let fin = constraint.finalize(self);
            assert!(
                !fin.result.is_changed(),
                "finalize must not change the board: {}",
                constraint.specific_name()
            );
            assert!(
                fin.add_constraints.is_empty(),
                "finalize must not add constraints: {}",
                constraint.specific_name()
            );
            if fin.result.is_invalid() {
                return Err(format!("{} found the board invalid.", constraint.specific_name()));
            }
            if fin.delete_self {
                self.constraints.remove(idx);
            } else {
                idx += 1;
            }
        }

        self.constraints_finalized = true;
        self.rebuild_enforce_lookup();
        Ok(())
    }

    /// Attaches constraints after finalization, running each one's `init`
    /// to its own fixpoint.
    pub fn attach_and_init(&mut self, constraints: Vec<Arc<dyn Constraint>>) -> LogicResult {
        let mut queue: std::collections::VecDeque<Arc<dyn Constraint>> = constraints.into();
        let mut result = LogicResult::None;
        while let Some(constraint) = queue.pop_front() {
            self.add_constraint(constraint.clone());
            let mut keep = true;
            loop {
                let init = constraint.init(self);
                queue.extend(init.add_constraints);
                if init.result.is_invalid() {
                    return LogicResult::Invalid;
                }
                if init.result.is_changed() {
                    result = LogicResult::Changed;
                }
                if init.delete_self {
                    keep = false;
                    break;
                }
                if !init.result.is_changed() {
                    break;
                }
            }
            if !keep {
                if let Some(pos) = self.constraints.iter().position(|c| Arc::ptr_eq(c, &constraint)) {
                    self.constraints.remove(pos);
                }
                self.lookup_valid = false;
            }
        }
        if self.constraints_finalized {
            self.rebuild_enforce_lookup();
        }
        result
    }

    /// Applies one deduction to the board.
    pub fn apply_deduction(&mut self, deduction: &Deduction) -> LogicResult {
        match deduction {
            Deduction::Eliminations(candidates) => {
                let mut result = LogicResult::None;
                for &candidate in candidates {
                    if self.has_candidate(candidate) {
                        result = result.combine(self.clear_candidate(candidate));
                        if result.is_invalid() {
                            return result;
                        }
                    }
                }
                result
            }
            Deduction::Singles(candidates) => {
                let mut result = LogicResult::None;
                for &candidate in candidates {
                    let (cell, value) = candidate.cell_and_value();
                    if self.cell(cell).is_given() && self.cell(cell).value() == value {
                        continue;
                    }
                    result = result.combine(self.set_as_given(cell, value));
                    if result.is_invalid() {
                        return result;
                    }
                }
                result
            }
            Deduction::AddConstraints(constraints) => {
                let result = self.attach_and_init(constraints.clone());
                result.combine(LogicResult::Changed)
            }
            Deduction::Invalid(_) => LogicResult::Invalid,
        }
    }

    /// Runs one round of constraint logic: the first deduction that
    /// changes the board (or proves it invalid) wins.
    pub fn logical_step_constraints(&mut self) -> LogicResult {
        for constraint in self.constraints.clone() {
            for deduction in constraint.logical_step(self) {
                let result = self.apply_deduction(&deduction);
                if !result.is_none() {
                    return result;
                }
            }
        }
        LogicResult::None
    }

    /// Runs every constraint's cheap propagation to a fixpoint. Used by
    /// disjunctive subboards and search.
    pub fn propagate(&mut self) -> LogicResult {
        let mut any = false;
        loop {
            let mut changed = false;
            for constraint in self.constraints.clone() {
                match constraint.brute_force_step(self) {
                    LogicResult::Invalid => return LogicResult::Invalid,
                    LogicResult::Changed => changed = true,
                    LogicResult::None => {}
                }
            }
            if !changed {
                break;
            }
            any = true;
        }
        if any {
            LogicResult::Changed
        } else {
            LogicResult::None
        }
    }

    // ------------------------------------------------------------------
    // Placement feasibility
    // ------------------------------------------------------------------

    /// Whether `values[i]` can be placed in `cells[i]` simultaneously:
    /// every candidate must be possible and no chosen pair weak-linked.
    pub fn can_place_digits(&self, cells: &[CellIndex], values: &[usize]) -> bool {
        debug_assert_eq!(cells.len(), values.len());
        for (&cell, &value) in cells.iter().zip(values) {
            if !self.cell(cell).has(value) {
                return false;
            }
        }
        for ((&c1, &v1), (&c2, &v2)) in cells.iter().zip(values).tuple_combinations() {
            if self.is_weak_link(c1.candidate(v1), c2.candidate(v2)) {
                return false;
            }
        }
        true
    }

    /// Whether the value multiset can be placed into the cells in *some*
    /// order.
    pub fn can_place_digits_any_order(&self, cells: &[CellIndex], values: &[usize]) -> bool {
        debug_assert_eq!(cells.len(), values.len());
        let mut used = vec![false; values.len()];
        let mut chosen: Vec<CandidateIndex> = Vec::with_capacity(cells.len());
        self.place_digits_recursive(cells, values, &mut used, &mut chosen)
    }

    fn place_digits_recursive(
        &self,
        cells: &[CellIndex],
        values: &[usize],
        used: &mut [bool],
        chosen: &mut Vec<CandidateIndex>,
    ) -> bool {
        if chosen.len() == cells.len() {
            return true;
        }
        let cell = cells[chosen.len()];
        for i in 0..values.len() {
            if used[i] || !self.cell(cell).has(values[i]) {
                continue;
            }
            let candidate = cell.candidate(values[i]);
            if chosen.iter().any(|&prev| self.is_weak_link(prev, candidate)) {
                continue;
            }
            used[i] = true;
            chosen.push(candidate);
            if self.place_digits_recursive(cells, values, used, chosen) {
                return true;
            }
            chosen.pop();
            used[i] = false;
        }
        false
    }

    // ------------------------------------------------------------------
    // Memo and constraint state
    // ------------------------------------------------------------------

    /// Looks up a cached combinatorial result.
    pub fn get_memo(&self, key: &str) -> Option<Arc<MemoValue>> {
        self.memo.lock().unwrap().get(key)
    }

    /// Caches a combinatorial result. The store is shared with every clone
    /// of this board; keys must be pure functions of their inputs.
    pub fn store_memo(&self, key: String, value: MemoValue) -> Arc<MemoValue> {
        self.memo.lock().unwrap().store(key, value)
    }

    pub fn memo_len(&self) -> usize {
        self.memo.lock().unwrap().len()
    }

    /// Allocates a backtrackable state slot, returning its typed key.
    pub fn register_state<T: Any + Clone>(&mut self, value: T) -> StateKey<T> {
        self.states.register(value)
    }

    pub fn state<T: Any + Clone>(&self, key: StateKey<T>) -> &T {
        self.states.get(key)
    }

    pub fn state_mut<T: Any + Clone>(&mut self, key: StateKey<T>) -> &mut T {
        self.states.get_mut(key)
    }

    /// Moves a state value out of its slot, leaving the default. Pairs
    /// with [`Board::put_state`] for hooks that mutate the board while
    /// holding their state.
    pub fn take_state<T: Any + Clone + Default>(&mut self, key: StateKey<T>) -> T {
        std::mem::take(self.states.get_mut(key))
    }

    pub fn put_state<T: Any + Clone>(&mut self, key: StateKey<T>, value: T) {
        *self.states.get_mut(key) = value;
    }

    // ------------------------------------------------------------------
    // Cloning
    // ------------------------------------------------------------------

    /// An independent copy with an empty constraint list, used to assemble
    /// one case of a disjunctive hypothesis.
    pub fn subboard_clone(&self) -> Board {
        let mut sub = self.clone();
        sub.constraints.clear();
        sub.lookup_valid = false;
        sub.constraints_finalized = false;
        sub.invalid_init = false;
        sub
    }
}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Board {}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("cells", &self.cells)
            .finish()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in self.all_cells() {
            let mask = self.cell(cell);
            if mask.is_single() {
                write!(f, "{}", mask.value())?;
            } else {
                write!(f, ".")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_board9() {
        let board = Board::new(9);
        assert_eq!(board.size(), 9);
        assert_eq!(board.num_cells(), 81);
        assert_eq!(board.num_candidates(), 729);
        assert_eq!(board.regions().len(), 27);
        for cell in board.all_cells() {
            assert_eq!(board.cell(cell), ValueMask::from_all_values(9));
        }
        // 20 distinct peers per cell, 9 values each, directed.
        assert_eq!(board.total_weak_links(), 81 * 20 * 9);
    }

    #[test]
    fn test_set_as_given_propagates() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        assert!(board.set_as_given(cu.cell(0, 0), 5).is_changed());
        assert!(board.cell(cu.cell(0, 0)).is_given());
        assert_eq!(board.cell(cu.cell(0, 0)).value(), 5);
        // Row, column, and box peers lose the 5.
        assert!(!board.cell(cu.cell(0, 8)).has(5));
        assert!(!board.cell(cu.cell(8, 0)).has(5));
        assert!(!board.cell(cu.cell(2, 2)).has(5));
        // Unrelated cells keep it.
        assert!(board.cell(cu.cell(4, 4)).has(5));
        // Setting it again is a no-op; a conflicting value is invalid.
        assert!(board.set_as_given(cu.cell(0, 0), 5).is_none());
        assert!(board.set_as_given(cu.cell(0, 0), 6).is_invalid());
    }

    #[test]
    fn test_keep_cell_mask_idempotent() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let mask = ValueMask::from_values(&[2, 4, 6]);
        assert!(board.keep_cell_mask(cu.cell(3, 3), mask).is_changed());
        assert!(board.keep_cell_mask(cu.cell(3, 3), mask).is_none());
        assert_eq!(board.cell(cu.cell(3, 3)), mask);
    }

    #[test]
    fn test_keep_cell_mask_naked_single() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let result = board.keep_cell_mask(cu.cell(0, 0), ValueMask::from_value(7));
        assert!(result.is_changed());
        assert!(board.cell(cu.cell(0, 0)).is_given());
        assert!(!board.cell(cu.cell(0, 1)).has(7));
    }

    #[test]
    fn test_keep_cell_mask_invalid() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        assert!(board.keep_cell_mask(cu.cell(0, 0), ValueMask::new()).is_invalid());
    }

    #[test]
    fn test_add_weak_link_idempotent() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let a = cu.cell(0, 0).candidate(1);
        let b = cu.cell(5, 5).candidate(2);
        let before = board.total_weak_links();
        assert!(board.add_weak_link(a, b).is_changed());
        assert_eq!(board.total_weak_links(), before + 2);
        assert!(board.add_weak_link(a, b).is_none());
        assert!(board.add_weak_link(b, a).is_none());
        assert!(board.is_weak_link(a, b));
        assert!(board.is_weak_link(b, a));
    }

    #[test]
    fn test_self_link_eliminates() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let a = cu.cell(0, 0).candidate(1);
        assert!(board.add_weak_link(a, a).is_changed());
        assert!(!board.has_candidate(a));
    }

    #[test]
    fn test_symmetry_invariant() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        board.add_weak_link(cu.cell(1, 1).candidate(3), cu.cell(2, 2).candidate(4));
        let graph = board.link_graph();
        for candidate in cu.all_candidates() {
            for linked in graph.row(candidate).links() {
                assert!(graph.is_linked(linked, candidate));
            }
        }
    }

    #[test]
    fn test_duplicate_region_ignored() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        let count = board.regions().len();
        assert!(board.add_region(Region::new("Row 1 again", &cells, RegionKind::Row)).is_none());
        assert_eq!(board.regions().len(), count);
    }

    #[test]
    fn test_split_into_groups() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        // Three cells in row 1 plus one lone cell elsewhere.
        let cells = vec![cu.cell(0, 0), cu.cell(0, 1), cu.cell(0, 2), cu.cell(5, 5)];
        let groups = board.split_into_groups(&cells);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1], vec![cu.cell(5, 5)]);
    }

    #[test]
    fn test_can_place_digits() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        let cells = vec![cu.cell(0, 0), cu.cell(0, 1)];
        assert!(board.can_place_digits(&cells, &[1, 2]));
        // Same value twice in one row is weak-linked.
        assert!(!board.can_place_digits(&cells, &[3, 3]));
        assert!(board.can_place_digits_any_order(&cells, &[4, 5]));
    }

    #[test]
    fn test_clone_independent() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let mut clone = board.clone();
        assert!(clone.set_as_given(cu.cell(0, 0), 1).is_changed());
        assert!(board.cell(cu.cell(0, 0)).has(2));
        assert_eq!(board.given_count(), 0);
        assert_eq!(clone.given_count(), 1);
        // Identical operations yield identical state.
        assert!(board.set_as_given(cu.cell(0, 0), 1).is_changed());
        assert_eq!(board, clone);
    }

    #[test]
    fn test_clone_links_cow() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        let mut clone = board.clone();
        let a = cu.cell(0, 0).candidate(1);
        let b = cu.cell(8, 8).candidate(1);
        clone.add_weak_link(a, b);
        assert!(clone.is_weak_link(a, b));
        assert!(!board.is_weak_link(a, b));
    }

    #[test]
    fn test_subboard_clone() {
        let board = Board::new(9);
        let sub = board.subboard_clone();
        assert!(sub.constraints().is_empty());
        assert!(!sub.constraints_finalized());
        assert_eq!(sub.regions().len(), board.regions().len());
    }

    #[test]
    fn test_state_round_trip() {
        let mut board = Board::new(9);
        let key = board.register_state(3usize);
        *board.state_mut(key) = 5;
        let clone = board.clone();
        *board.state_mut(key) = 7;
        assert_eq!(*board.state(key), 7);
        assert_eq!(*clone.state(key), 5);
    }
}
