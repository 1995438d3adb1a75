//! Contains [`CellUtility`] for size-dependent cell and candidate helpers.

use crate::prelude::*;
use itertools::Itertools;

/// A small helper carrying the board size so that cell and candidate
/// construction does not need the size passed to every call.
#[derive(Copy, Clone, Debug)]
pub struct CellUtility {
    size: usize,
}

impl CellUtility {
    /// Creates a new instance for the given board size.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// The board size.
    pub fn size(self) -> usize {
        self.size
    }

    /// The number of cells on the board.
    pub fn cell_count(self) -> usize {
        self.size * self.size
    }

    /// The number of candidates on the board.
    pub fn candidate_count(self) -> usize {
        self.cell_count() * self.size
    }

    /// Creates a [`CellIndex`] from a 0-based row and column.
    pub fn cell(self, row: usize, col: usize) -> CellIndex {
        CellIndex::from_rc(row, col, self.size)
    }

    /// Creates a [`CellIndex`] from a linear index.
    pub fn cell_index(self, index: usize) -> CellIndex {
        CellIndex::new(index, self.size)
    }

    /// Creates a [`CandidateIndex`] from a cell and value.
    pub fn candidate(self, cell: CellIndex, value: usize) -> CandidateIndex {
        CandidateIndex::from_cv(cell, value)
    }

    /// Creates a [`CandidateIndex`] from a linear index.
    pub fn candidate_index(self, index: usize) -> CandidateIndex {
        CandidateIndex::new(index, self.size)
    }

    /// Iterates over every cell on the board in reading order.
    pub fn all_cells(self) -> impl Iterator<Item = CellIndex> {
        (0..self.cell_count()).map(move |i| self.cell_index(i))
    }

    /// Iterates over every candidate on the board.
    pub fn all_candidates(self) -> impl Iterator<Item = CandidateIndex> {
        (0..self.candidate_count()).map(move |i| self.candidate_index(i))
    }

    /// All same-value candidate pairs within a group of cells.
    ///
    /// Passing a group whose cells cannot repeat yields exactly the weak
    /// links that encode that group's distinctness.
    ///
    /// # Example
    /// ```
    /// # use variant_solver_lib::cell_utility::CellUtility;
    /// let cu = CellUtility::new(9);
    /// let cells = vec![cu.cell(0, 0), cu.cell(0, 1), cu.cell(0, 2)];
    /// let pairs = cu.candidate_pairs(&cells);
    /// assert_eq!(pairs.len(), 27);
    /// ```
    pub fn candidate_pairs(self, cells: &[CellIndex]) -> Vec<(CandidateIndex, CandidateIndex)> {
        let mut result = Vec::new();
        for value in 1..=self.size {
            for pair in cells.iter().combinations(2) {
                result.push((pair[0].candidate(value), pair[1].candidate(value)));
            }
        }
        result
    }

    /// A compact description of a cell list: `r1c123` for cells sharing a
    /// row, `r123c1` for a shared column, otherwise row groups joined by
    /// commas.
    pub fn compact_name(self, cells: &[CellIndex]) -> String {
        if cells.is_empty() {
            return String::new();
        }
        if cells.len() == 1 {
            return cells[0].to_string();
        }

        let sep = if self.size <= 9 { "" } else { "," };
        let cells: Vec<(usize, usize)> = cells.iter().sorted().map(|cell| cell.rc()).collect();

        let first_row = cells[0].0;
        if cells.iter().all(|&(r, _)| r == first_row) {
            return format!("r{}c{}", first_row + 1, cells.iter().map(|&(_, c)| c + 1).join(sep));
        }

        let first_col = cells[0].1;
        if cells.iter().all(|&(_, c)| c == first_col) {
            return format!("r{}c{}", cells.iter().map(|&(r, _)| r + 1).join(sep), first_col + 1);
        }

        // Mixed rows and columns: one group per row.
        let mut groups: Vec<String> = Vec::new();
        for (row, row_cells) in &cells.iter().group_by(|&&(r, _)| r) {
            groups.push(format!("r{}c{}", row + 1, row_cells.map(|&(_, c)| c + 1).join(sep)));
        }
        groups.join(",")
    }
}
