//! Contains the [`SkyscraperConstraint`] struct.

use variant_solver_lib::memo::{cells_signature, mask_signature};
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a skyscraper clue: reading the line from the clue
/// edge, exactly `clue` values are larger than everything before them.
///
/// Deductions come from a dynamic program over (tallest so far, seen so
/// far) states: a forward sweep collects the states reachable before each
/// position, a backward sweep keeps those that can still finish on
/// (tallest = N, seen = clue), and a value survives where some state
/// transitions through it. Results are memoized per mask signature.
pub struct SkyscraperConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    clue: usize,
}

impl SkyscraperConstraint {
    pub fn new(size: usize, cells: Vec<CellIndex>, clue: usize) -> Result<Self, String> {
        if cells.len() != size {
            return Err("a skyscraper clue needs a full row or column".to_owned());
        }
        if clue < 1 || clue > size {
            return Err(format!("skyscraper clue {} is out of range", clue));
        }
        let cu = CellUtility::new(size);
        let specific_name = format!("Skyscraper {} at {}", clue, cu.compact_name(&cells));
        Ok(Self { specific_name, cells, clue })
    }

    /// The per-position masks of values on some valid prefix/suffix path,
    /// or `None` when no path reaches (max = N, count = clue).
    fn dp_masks(&self, board: &Board) -> Option<Vec<ValueMask>> {
        let key = format!(
            "skyscraper|{}|{}|{}",
            cells_signature(&self.cells),
            mask_signature(board, &self.cells),
            self.clue
        );
        if let Some(cached) = board.get_memo(&key) {
            return match &*cached {
                MemoValue::Flag(false) => None,
                MemoValue::Masks(masks) => Some(masks.clone()),
                _ => unreachable!("wrong memo payload for {}", key),
            };
        }

        let result = self.compute_dp_masks(board);
        match &result {
            None => {
                board.store_memo(key, MemoValue::Flag(false));
            }
            Some(masks) => {
                board.store_memo(key, MemoValue::Masks(masks.clone()));
            }
        }
        result
    }

    fn compute_dp_masks(&self, board: &Board) -> Option<Vec<ValueMask>> {
        let size = board.size();
        let positions = self.cells.len();
        let num_states = (size + 1) * (size + 2);
        let encode = |max: usize, count: usize| max * (size + 2) + count;
        let transition = |max: usize, count: usize, value: usize| {
            if value > max {
                (value, count + 1)
            } else {
                (max, count)
            }
        };

        let masks: Vec<ValueMask> =
            self.cells.iter().map(|&cell| board.cell(cell).without_given()).collect();

        // Forward: states reachable before each position.
        let mut forward = vec![vec![false; num_states]; positions + 1];
        forward[0][encode(0, 0)] = true;
        for pos in 0..positions {
            for max in 0..=size {
                for count in 0..=size {
                    if !forward[pos][encode(max, count)] {
                        continue;
                    }
                    for value in masks[pos] {
                        let (nmax, ncount) = transition(max, count, value);
                        if ncount <= self.clue {
                            forward[pos + 1][encode(nmax, ncount)] = true;
                        }
                    }
                }
            }
        }

        if !forward[positions][encode(size, self.clue)] {
            return None;
        }

        // Backward: states that can still finish on (N, clue).
        let mut backward = vec![vec![false; num_states]; positions + 1];
        backward[positions][encode(size, self.clue)] = true;
        for pos in (0..positions).rev() {
            for max in 0..=size {
                for count in 0..=self.clue {
                    if !forward[pos][encode(max, count)] {
                        continue;
                    }
                    for value in masks[pos] {
                        let (nmax, ncount) = transition(max, count, value);
                        if backward[pos + 1][encode(nmax, ncount)] {
                            backward[pos][encode(max, count)] = true;
                            break;
                        }
                    }
                }
            }
        }

        // A value survives where some live state transitions through it.
        let mut keeps = vec![ValueMask::new(); positions];
        for pos in 0..positions {
            for max in 0..=size {
                for count in 0..=self.clue {
                    if !forward[pos][encode(max, count)] || !backward[pos][encode(max, count)] {
                        continue;
                    }
                    for value in masks[pos] {
                        let (nmax, ncount) = transition(max, count, value);
                        if backward[pos + 1][encode(nmax, ncount)] {
                            keeps[pos] = keeps[pos].with(value);
                        }
                    }
                }
            }
        }
        Some(keeps)
    }
}

impl Constraint for SkyscraperConstraint {
    fn name(&self) -> &str {
        "Skyscraper"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    fn enforce(&self, board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        // Only worth checking once the whole line is placed.
        let mut values = Vec::with_capacity(self.cells.len());
        for &cell in &self.cells {
            let mask = board.cell(cell);
            if !mask.is_single() {
                return true;
            }
            values.push(mask.value());
        }
        let mut tallest = 0;
        let mut seen = 0;
        for value in values {
            if value > tallest {
                tallest = value;
                seen += 1;
            }
        }
        seen == self.clue
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let keeps = match self.dp_masks(board) {
            Some(keeps) => keeps,
            None => {
                return vec![Deduction::Invalid(format!(
                    "no arrangement satisfies {}",
                    self.specific_name
                ))]
            }
        };

        let mut eliminations = Vec::new();
        for (&cell, keep) in self.cells.iter().zip(keeps) {
            let removed = board.cell(cell).value_bits() & !keep.value_bits();
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

    fn row_line(cu: CellUtility) -> Vec<CellIndex> {
        (0..9).map(|col| cu.cell(0, col)).collect()
    }

    #[test]
    fn test_clue_one_forces_front_nine() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let constraint = SkyscraperConstraint::new(9, row_line(cu), 1).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // Only one visible building: the 9 stands in front.
        assert_eq!(board.cell(cu.cell(0, 0)).value(), 9);
    }

    #[test]
    fn test_clue_nine_forces_staircase() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let constraint = SkyscraperConstraint::new(9, row_line(cu), 9).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // All visible: the row ascends 1..9.
        for col in 0..9 {
            assert_eq!(board.cell(cu.cell(0, col)).value(), col + 1);
        }
    }

    #[test]
    fn test_clue_bounds_first_cell() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let constraint = SkyscraperConstraint::new(9, row_line(cu), 4).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        // With 4 visible the first cell can be at most 6.
        assert!(board.cell(cu.cell(0, 0)).max() <= 6);
    }

    #[test]
    fn test_enforce_counts_visibles() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let constraint = SkyscraperConstraint::new(9, row_line(cu), 2).unwrap();
        board.add_constraint(Arc::new(constraint));
        board.finalize_constraints().unwrap();
        // 1 2 3 4 5 6 7 8 up front would show 9 buildings, not 2.
        // Build 8 7 6 5 4 3 2 1 then 9 at the back: shows exactly 2.
        for (col, value) in [8, 7, 6, 5, 4, 3, 2, 1].iter().enumerate() {
            assert!(!board.set_as_given(cu.cell(0, col), *value).is_invalid());
        }
        assert!(!board.set_as_given(cu.cell(0, 8), 9).is_invalid());
        assert!(board.is_solved() || board.cell(cu.cell(0, 8)).is_given());
    }

    #[test]
    fn test_bad_clue_rejected() {
        let cu = CellUtility::new(9);
        let cells: Vec<CellIndex> = (0..9).map(|col| cu.cell(0, col)).collect();
        assert!(SkyscraperConstraint::new(9, cells.clone(), 0).is_err());
        assert!(SkyscraperConstraint::new(9, cells[..4].to_vec(), 2).is_err());
    }
}
