//! Contains [`SumGroup`] for reasoning about sums over one group of
//! mutually distinct cells.

use crate::memo::{cells_signature, mask_signature};
use crate::prelude::*;
use itertools::Itertools;

/// A group of cells known to hold pairwise distinct values (the caller
/// derives this from a shared region), optionally with one globally
/// excluded value.
///
/// All queries are memoized in the board's shared store keyed by the
/// group's cells, the excluded value, the current cell masks, and (where
/// relevant) the requested sum set, so repeated questions during one solve
/// cost a lookup.
#[derive(Debug, Clone)]
pub struct SumGroup {
    cells: Vec<CellIndex>,
    excluded_value: usize,
    cells_sig: String,
}

/// Snapshot of the group against a specific board state.
struct GroupInfo {
    placed_sum: usize,
    unset_cells: Vec<CellIndex>,
    unset_masks: Vec<ValueMask>,
    union_mask: ValueMask,
}

impl SumGroup {
    pub fn new(cells: Vec<CellIndex>) -> Self {
        Self::with_excluded(cells, 0)
    }

    /// Creates a group where `excluded_value` (1-based, 0 for none) may not
    /// be used by any cell.
    pub fn with_excluded(mut cells: Vec<CellIndex>, excluded_value: usize) -> Self {
        cells.sort();
        let cells_sig = cells_signature(&cells);
        Self { cells, excluded_value, cells_sig }
    }

    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    fn filter_mask(&self, board: &Board) -> ValueMask {
        if self.excluded_value == 0 {
            board.all_values()
        } else {
            board.all_values().without(self.excluded_value)
        }
    }

    /// Gathers placed values and unset cells. `None` when some cell has no
    /// remaining candidates under the exclusion.
    fn prep(&self, board: &Board) -> Option<GroupInfo> {
        let filter = self.filter_mask(board);
        let mut placed_sum = 0;
        let mut unset_cells = Vec::new();
        let mut unset_masks = Vec::new();
        let mut union_mask = ValueMask::new();

        for &cell in &self.cells {
            let mask = board.cell(cell).without_given() & filter;
            if mask.is_empty() {
                return None;
            }
            if mask.is_single() {
                placed_sum += mask.value();
            } else {
                union_mask = union_mask | mask;
                unset_cells.push(cell);
                unset_masks.push(mask);
            }
        }

        Some(GroupInfo { placed_sum, unset_cells, unset_masks, union_mask })
    }

    fn memo_key(&self, board: &Board, purpose: &str, sums: &[usize]) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            purpose,
            self.cells_sig,
            self.excluded_value,
            mask_signature(board, &self.cells),
            sums.iter().join(",")
        )
    }

    /// The smallest and largest totals realizable by simultaneously
    /// placing distinct values into the group's cells. `None` when no
    /// valid placement exists.
    pub fn min_max_sum(&self, board: &Board) -> Option<(usize, usize)> {
        let key = self.memo_key(board, "sumgroup_minmax", &[]);
        if let Some(cached) = board.get_memo(&key) {
            return match *cached {
                // An empty range encodes "no valid placement".
                MemoValue::MinMax(min, max) if min > max => None,
                MemoValue::MinMax(min, max) => Some((min, max)),
                _ => unreachable!("wrong memo payload for {}", key),
            };
        }

        let result = self.compute_min_max(board);
        let (min, max) = result.unwrap_or((1, 0));
        board.store_memo(key, MemoValue::MinMax(min, max));
        result
    }

    fn compute_min_max(&self, board: &Board) -> Option<(usize, usize)> {
        let info = self.prep(board)?;

        if info.unset_cells.is_empty() {
            return Some((info.placed_sum, info.placed_sum));
        }

        // A group covering the whole board's value range sums exactly.
        if self.cells.len() == board.size() && self.excluded_value == 0 {
            let total = board.size() * (board.size() + 1) / 2;
            return Some((total, total));
        }

        if info.unset_cells.len() == 1 {
            let mask = info.unset_masks[0];
            return Some((info.placed_sum + mask.min(), info.placed_sum + mask.max()));
        }

        // As many unset values as unset cells: the completion is forced.
        if info.union_mask.count() == info.unset_cells.len() {
            let values = info.union_mask.to_vec();
            if !board.can_place_digits_any_order(&info.unset_cells, &values) {
                return None;
            }
            let sum: usize = info.placed_sum + values.iter().sum::<usize>();
            return Some((sum, sum));
        }

        let mut min = usize::MAX;
        let mut max = 0;
        for combo in info.union_mask.to_vec().into_iter().combinations(info.unset_cells.len()) {
            if board.can_place_digits_any_order(&info.unset_cells, &combo) {
                let sum = info.placed_sum + combo.iter().sum::<usize>();
                min = min.min(sum);
                max = max.max(sum);
            }
        }
        if max == 0 {
            None
        } else {
            Some((min, max))
        }
    }

    /// All attainable totals, sorted and unique.
    pub fn possible_sums(&self, board: &Board) -> Vec<usize> {
        let key = self.memo_key(board, "sumgroup_sums", &[]);
        if let Some(cached) = board.get_memo(&key) {
            return match &*cached {
                MemoValue::Sums(sums) => sums.clone(),
                _ => unreachable!("wrong memo payload for {}", key),
            };
        }

        let result = self.compute_possible_sums(board);
        board.store_memo(key, MemoValue::Sums(result.clone()));
        result
    }

    fn compute_possible_sums(&self, board: &Board) -> Vec<usize> {
        let info = match self.prep(board) {
            Some(info) => info,
            None => return Vec::new(),
        };

        if info.unset_cells.is_empty() {
            return vec![info.placed_sum];
        }

        if info.unset_cells.len() == 1 {
            return info.unset_masks[0].to_vec().iter().map(|v| info.placed_sum + v).collect();
        }

        let mut sums: Vec<usize> = info
            .union_mask
            .to_vec()
            .into_iter()
            .combinations(info.unset_cells.len())
            .filter(|combo| board.can_place_digits_any_order(&info.unset_cells, combo))
            .map(|combo| info.placed_sum + combo.iter().sum::<usize>())
            .collect();
        sums.sort_unstable();
        sums.dedup();
        sums
    }

    pub fn is_sum_possible(&self, board: &Board, sum: usize) -> bool {
        self.possible_sums(board).binary_search(&sum).is_ok()
    }

    /// The per-cell masks of values that appear in some realization whose
    /// total lies in `sums`, paired with their cells. `None` when no such
    /// realization exists.
    pub fn restricted_masks(
        &self,
        board: &Board,
        sums: &[usize],
    ) -> Option<Vec<(CellIndex, ValueMask)>> {
        let info = self.prep(board)?;

        if info.unset_cells.is_empty() {
            return if sums.contains(&info.placed_sum) { Some(Vec::new()) } else { None };
        }

        let key = self.memo_key(board, "sumgroup_restrict", sums);
        if let Some(cached) = board.get_memo(&key) {
            return match &*cached {
                MemoValue::Flag(false) => None,
                MemoValue::Masks(masks) => {
                    Some(info.unset_cells.iter().copied().zip(masks.iter().copied()).collect())
                }
                _ => unreachable!("wrong memo payload for {}", key),
            };
        }

        let result = self.compute_restricted_masks(board, sums, &info);
        match &result {
            None => {
                board.store_memo(key, MemoValue::Flag(false));
            }
            Some(pairs) => {
                board.store_memo(key, MemoValue::Masks(pairs.iter().map(|&(_, m)| m).collect()));
            }
        }
        result
    }

    fn compute_restricted_masks(
        &self,
        board: &Board,
        sums: &[usize],
        info: &GroupInfo,
    ) -> Option<Vec<(CellIndex, ValueMask)>> {
        // A restriction that excludes nothing attainable is a no-op; skip
        // the assignment walk.
        let possible = self.possible_sums(board);
        if possible.is_empty() {
            return None;
        }
        if possible.iter().all(|s| sums.contains(s)) {
            return Some(
                info.unset_cells.iter().copied().zip(info.unset_masks.iter().copied()).collect(),
            );
        }

        if info.unset_cells.len() == 1 {
            let keep: ValueMask = info.unset_masks[0]
                .to_vec()
                .into_iter()
                .filter(|v| sums.contains(&(info.placed_sum + v)))
                .collect();
            if keep.is_empty() {
                return None;
            }
            return Some(vec![(info.unset_cells[0], keep)]);
        }

        let mut keeps = vec![ValueMask::new(); info.unset_cells.len()];
        let mut any = false;
        for combo in info.union_mask.to_vec().into_iter().combinations(info.unset_cells.len()) {
            if !sums.contains(&(info.placed_sum + combo.iter().sum::<usize>())) {
                continue;
            }
            let mut used = vec![false; combo.len()];
            let mut chosen = Vec::with_capacity(combo.len());
            any |= self.accumulate_placements(board, info, &combo, &mut used, &mut chosen, &mut keeps);
        }

        if any {
            Some(info.unset_cells.iter().copied().zip(keeps).collect())
        } else {
            None
        }
    }

    /// Walks every valid ordering of `combo` over the unset cells, ORing
    /// each placed value into the keep mask of its cell.
    fn accumulate_placements(
        &self,
        board: &Board,
        info: &GroupInfo,
        combo: &[usize],
        used: &mut [bool],
        chosen: &mut Vec<CandidateIndex>,
        keeps: &mut [ValueMask],
    ) -> bool {
        let position = chosen.len();
        if position == info.unset_cells.len() {
            for (keep, candidate) in keeps.iter_mut().zip(chosen.iter()) {
                *keep = keep.with(candidate.value());
            }
            return true;
        }

        let cell = info.unset_cells[position];
        let mut any = false;
        for i in 0..combo.len() {
            if used[i] || !info.unset_masks[position].has(combo[i]) {
                continue;
            }
            let candidate = cell.candidate(combo[i]);
            if chosen.iter().any(|&prev| board.is_weak_link(prev, candidate)) {
                continue;
            }
            used[i] = true;
            chosen.push(candidate);
            any |= self.accumulate_placements(board, info, combo, used, chosen, keeps);
            chosen.pop();
            used[i] = false;
        }
        any
    }

    /// Intersects each cell with the values consistent with some
    /// realization totaling a member of `sums`.
    pub fn restrict_sums(&self, board: &mut Board, sums: &[usize]) -> LogicResult {
        match self.restricted_masks(board, sums) {
            None => LogicResult::Invalid,
            Some(pairs) => {
                let mut result = LogicResult::None;
                for (cell, keep) in pairs {
                    result = result.combine(board.keep_cell_mask(cell, keep));
                    if result.is_invalid() {
                        return result;
                    }
                }
                result
            }
        }
    }
}

impl std::fmt::Display for SumGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cells.is_empty() {
            return write!(f, "SumGroup[]");
        }
        let cu = CellUtility::new(self.cells[0].size());
        write!(f, "SumGroup[{}]", cu.compact_name(&self.cells))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row_group(board: &Board, len: usize) -> SumGroup {
        let cu = board.cell_utility();
        SumGroup::new((0..len).map(|col| cu.cell(0, col)).collect())
    }

    #[test]
    fn test_min_max_empty_board() {
        let board = Board::new(9);
        let group = row_group(&board, 3);
        // Distinct values in one row: min 1+2+3, max 7+8+9.
        assert_eq!(group.min_max_sum(&board), Some((6, 24)));
    }

    #[test]
    fn test_min_max_full_group() {
        let board = Board::new(9);
        let group = row_group(&board, 9);
        assert_eq!(group.min_max_sum(&board), Some((45, 45)));
    }

    #[test]
    fn test_min_max_one_unset() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        board.set_as_given(cu.cell(0, 0), 4);
        let group = row_group(&board, 2);
        // 4 placed, partner ranges over 1..9 minus 4.
        assert_eq!(group.min_max_sum(&board), Some((5, 13)));
    }

    #[test]
    fn test_possible_sums_within_min_max() {
        let board = Board::new(9);
        let group = row_group(&board, 3);
        let (min, max) = group.min_max_sum(&board).unwrap();
        let sums = group.possible_sums(&board);
        assert!(!sums.is_empty());
        assert!(sums.iter().all(|&s| s >= min && s <= max));
        assert!(group.is_sum_possible(&board, 6));
        assert!(!group.is_sum_possible(&board, 5));
    }

    #[test]
    fn test_restrict_sums_shrinks() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let group = row_group(&board, 3);
        assert!(group.restrict_sums(&mut board, &[6]).is_changed());
        for col in 0..3 {
            assert_eq!(board.cell(cu.cell(0, col)), ValueMask::from_values(&[1, 2, 3]));
        }
        // Applying the same restriction again changes nothing.
        assert!(group.restrict_sums(&mut board, &[6]).is_none());
        // Restricting never grows a mask.
        assert!(group.restrict_sums(&mut board, &[6, 24]).is_none());
    }

    #[test]
    fn test_restrict_sums_impossible() {
        let mut board = Board::new(9);
        let group = row_group(&board, 3);
        assert!(group.restrict_sums(&mut board, &[5]).is_invalid());
    }

    #[test]
    fn test_excluded_value() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        let group = SumGroup::with_excluded(vec![cu.cell(0, 0), cu.cell(0, 1)], 1);
        // 1 unusable: min becomes 2+3.
        assert_eq!(group.min_max_sum(&board), Some((5, 17)));
    }

    #[test]
    fn test_memoized() {
        let board = Board::new(9);
        let group = row_group(&board, 3);
        let before = board.memo_len();
        let first = group.possible_sums(&board);
        let after = board.memo_len();
        assert!(after > before);
        let second = group.possible_sums(&board);
        assert_eq!(first, second);
        assert_eq!(board.memo_len(), after);
    }
}
