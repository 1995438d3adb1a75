//! Contains [`SumCellsHelper`] for reasoning about sums over an arbitrary
//! cell list.

use crate::prelude::*;
use std::collections::BTreeSet;

/// Exact sumset convolution is only attempted up to this many incomplete
/// groups; beyond it the full min..max interval is returned instead.
const MAX_CONVOLVED_GROUPS: usize = 5;

/// Composes several [`SumGroup`]s over a cell list.
///
/// The list is partitioned via [`Board::split_into_groups`] into
/// mutually-exclusive distinctness groups; totals combine additively
/// across groups.
#[derive(Debug, Clone)]
pub struct SumCellsHelper {
    cells: Vec<CellIndex>,
    groups: Vec<SumGroup>,
}

impl SumCellsHelper {
    /// Partitions `cells` against the board's current region table.
    pub fn new(board: &Board, cells: &[CellIndex]) -> Self {
        let groups = board
            .split_into_groups(cells)
            .into_iter()
            .map(SumGroup::new)
            .collect();
        Self { cells: cells.to_vec(), groups }
    }

    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    pub fn groups(&self) -> &[SumGroup] {
        &self.groups
    }

    /// Per-group (min, max) ranges. `None` when any group has no valid
    /// placement.
    fn group_ranges(&self, board: &Board) -> Option<Vec<(usize, usize)>> {
        self.groups.iter().map(|g| g.min_max_sum(board)).collect()
    }

    /// The smallest and largest attainable totals.
    pub fn sum_range(&self, board: &Board) -> Option<(usize, usize)> {
        let ranges = self.group_ranges(board)?;
        Some((
            ranges.iter().map(|&(min, _)| min).sum(),
            ranges.iter().map(|&(_, max)| max).sum(),
        ))
    }

    /// All attainable totals. Exact (a sumset convolution across groups)
    /// while few groups are incomplete; otherwise the conservative
    /// min..max interval.
    pub fn possible_sums(&self, board: &Board) -> Option<Vec<usize>> {
        let ranges = self.group_ranges(board)?;
        let incomplete = ranges.iter().filter(|&&(min, max)| min != max).count();

        if incomplete > MAX_CONVOLVED_GROUPS {
            let (min, max) = self.sum_range(board)?;
            return Some((min..=max).collect());
        }

        let mut totals: BTreeSet<usize> = BTreeSet::new();
        totals.insert(0);
        for group in &self.groups {
            let sums = group.possible_sums(board);
            if sums.is_empty() {
                return None;
            }
            let mut next = BTreeSet::new();
            for &total in &totals {
                for &sum in &sums {
                    next.insert(total + sum);
                }
            }
            totals = next;
        }
        Some(totals.into_iter().collect())
    }

    /// Tightens every group to the totals compatible with some member of
    /// `sums`.
    ///
    /// Each group's total may deviate from its minimum by at most
    /// `s_max - total_min` and from its maximum by at most
    /// `total_max - s_min`; with exactly one incomplete group the target
    /// becomes exact.
    pub fn restrict_sums(&self, board: &mut Board, sums: &[usize]) -> LogicResult {
        let ranges = match self.group_ranges(board) {
            Some(ranges) => ranges,
            None => return LogicResult::Invalid,
        };
        let total_min: usize = ranges.iter().map(|&(min, _)| min).sum();
        let total_max: usize = ranges.iter().map(|&(_, max)| max).sum();

        let valid: Vec<usize> =
            sums.iter().copied().filter(|&s| s >= total_min && s <= total_max).collect();
        if valid.is_empty() {
            return LogicResult::Invalid;
        }
        let s_min = *valid.iter().min().unwrap();
        let s_max = *valid.iter().max().unwrap();

        let incomplete: Vec<usize> = ranges
            .iter()
            .enumerate()
            .filter(|(_, &(min, max))| min != max)
            .map(|(i, _)| i)
            .collect();

        // One incomplete group: everything else is fixed, so its target
        // sums are exact (gaps in `sums` included).
        if incomplete.len() == 1 {
            let index = incomplete[0];
            let fixed: usize = total_min - ranges[index].0;
            let targets: Vec<usize> =
                valid.iter().filter(|&&s| s >= fixed).map(|&s| s - fixed).collect();
            if targets.is_empty() {
                return LogicResult::Invalid;
            }
            return self.groups[index].restrict_sums(board, &targets);
        }

        let up_slack = s_max - total_min;
        let down_slack = total_max - s_min;
        let mut result = LogicResult::None;
        for (group, &(g_min, g_max)) in self.groups.iter().zip(ranges.iter()) {
            let lo = g_max.saturating_sub(down_slack);
            let hi = g_min + up_slack;
            if lo <= g_min && hi >= g_max {
                continue;
            }
            let targets: Vec<usize> = group
                .possible_sums(board)
                .into_iter()
                .filter(|&s| s >= lo && s <= hi)
                .collect();
            if targets.is_empty() {
                return LogicResult::Invalid;
            }
            result = result.combine(group.restrict_sums(board, &targets));
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
    fn test_groups_follow_regions() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        // Three cells of row 1 plus two cells of column 1.
        let cells =
            vec![cu.cell(0, 0), cu.cell(0, 1), cu.cell(0, 2), cu.cell(4, 0), cu.cell(5, 0)];
        let helper = SumCellsHelper::new(&board, &cells);
        assert_eq!(helper.groups().len(), 2);
    }

    #[test]
    fn test_sum_range_additive() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        // Two cells in different rows/columns/boxes: no distinctness.
        let helper = SumCellsHelper::new(&board, &[cu.cell(0, 0), cu.cell(4, 4)]);
        assert_eq!(helper.groups().len(), 2);
        assert_eq!(helper.sum_range(&board), Some((2, 18)));
    }

    #[test]
    fn test_possible_sums_convolution() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        board.keep_cell_mask(cu.cell(0, 0), ValueMask::from_values(&[1, 2]));
        board.keep_cell_mask(cu.cell(4, 4), ValueMask::from_values(&[1, 3]));
        let helper = SumCellsHelper::new(&board, &[cu.cell(0, 0), cu.cell(4, 4)]);
        assert_eq!(helper.possible_sums(&board), Some(vec![2, 3, 4, 5]));
    }

    #[test]
    fn test_restrict_sums_tightens() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..3).map(|col| cu.cell(0, col)).collect();
        let helper = SumCellsHelper::new(&board, &cells);
        assert!(helper.restrict_sums(&mut board, &[6]).is_changed());
        for &cell in &cells {
            assert_eq!(board.cell(cell), ValueMask::from_values(&[1, 2, 3]));
        }
    }

    #[test]
    fn test_restrict_sums_out_of_range() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells: Vec<CellIndex> = (0..2).map(|col| cu.cell(0, col)).collect();
        let helper = SumCellsHelper::new(&board, &cells);
        assert!(helper.restrict_sums(&mut board, &[100]).is_invalid());
    }
}
