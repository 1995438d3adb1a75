//! Contains the [`RegionSumLinesConstraint`] struct.

use crate::equal_sum_constraint::{EqualSumConstraint, SumSet};
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a region-sum line: the cells inside each box the
/// line passes through have equal sums. Initialization splits the line at
/// box borders and reduces to an [`EqualSumConstraint`] over the segments.
pub struct RegionSumLinesConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
}

impl RegionSumLinesConstraint {
    pub fn new(cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("a region sum line needs cells".to_owned());
        }
        let specific_name = format!("Region Sum Line at {}", cells[0]);
        Ok(Self { specific_name, cells })
    }

    /// Consecutive runs of line cells within one box. A line that leaves a
    /// box and later re-enters starts a fresh segment.
    fn segments(&self, board: &Board) -> Vec<Vec<CellIndex>> {
        let box_of = |cell: CellIndex| {
            board
                .regions()
                .iter()
                .position(|region| *region.kind() == RegionKind::Box && region.contains(cell))
        };

        let mut segments: Vec<Vec<CellIndex>> = Vec::new();
        let mut current_box = None;
        for &cell in &self.cells {
            let cell_box = box_of(cell);
            if cell_box != current_box || segments.is_empty() {
                segments.push(Vec::new());
                current_box = cell_box;
            }
            segments.last_mut().unwrap().push(cell);
        }
        segments
    }
}

impl Constraint for RegionSumLinesConstraint {
    fn name(&self) -> &str {
        "Region Sum Lines"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let segments = self.segments(board);
        if segments.len() < 2 {
            // A line inside one box constrains nothing.
            return InitResult::unchanged().and_delete_self();
        }
        let sets = segments.into_iter().map(SumSet::new).collect();
        let equal = EqualSumConstraint::new(board, &self.specific_name, sets);
        InitResult::unchanged().with_constraints(vec![Arc::new(equal)]).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_segments_split_at_box_borders() {
        let board = Board::new(9);
        let cu = board.cell_utility();
        // r1c2, r1c3 in box 1; r1c4, r1c5 in box 2.
        let cells = vec![cu.cell(0, 1), cu.cell(0, 2), cu.cell(0, 3), cu.cell(0, 4)];
        let line = RegionSumLinesConstraint::new(cells).unwrap();
        let segments = line.segments(&board);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn test_equal_segment_sums() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // One cell in box 1, two cells in box 2.
        let cells = vec![cu.cell(0, 2), cu.cell(0, 3), cu.cell(0, 4)];
        let line = RegionSumLinesConstraint::new(cells.clone()).unwrap();
        board.add_constraint(Arc::new(line));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // A single cell must match a two-cell distinct sum: at least 3.
        assert!(!board.cell(cells[0]).has(1));
        assert!(!board.cell(cells[0]).has(2));

        board.set_as_given(cells[0], 4);
        assert!(board.propagate().is_changed());
        // 4 = 1+3 over the second segment (2+2 repeats in the row).
        assert_eq!(board.cell(cells[1]), ValueMask::from_values(&[1, 3]));
        assert_eq!(board.cell(cells[2]), ValueMask::from_values(&[1, 3]));
    }

    #[test]
    fn test_single_box_line_is_trivial() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = vec![cu.cell(0, 0), cu.cell(0, 1)];
        let line = RegionSumLinesConstraint::new(cells).unwrap();
        board.add_constraint(Arc::new(line));
        board.finalize_constraints().unwrap();
        assert!(board.constraints().is_empty());
    }
}
