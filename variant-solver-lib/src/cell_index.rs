//! Contains [`CellIndex`] for representing the location of a specific cell.

use crate::prelude::*;

/// The location of a cell on a board, stored as `row * size + col`.
///
/// The index is not tied to a specific board instance, only to the board
/// size, which it carries so that row/column math needs no extra argument.
#[derive(Clone, Copy, Debug)]
pub struct CellIndex {
    index: usize,
    size: usize,
}

impl CellIndex {
    /// Creates a new instance from a linear cell index.
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Creates a new instance from a row and column index (0-based).
    pub fn from_rc(row: usize, column: usize, size: usize) -> Self {
        Self { index: row * size + column, size }
    }

    /// The linear index of the cell.
    pub fn index(self) -> usize {
        self.index
    }

    /// The size of the board this index belongs to.
    pub fn size(self) -> usize {
        self.size
    }

    /// The 0-based row of the cell.
    ///
    /// # Example
    /// ```
    /// # use variant_solver_lib::cell_index::CellIndex;
    /// assert_eq!(CellIndex::new(0, 9).row(), 0);
    /// assert_eq!(CellIndex::new(80, 9).row(), 8);
    /// ```
    pub fn row(self) -> usize {
        self.index / self.size
    }

    /// The 0-based column of the cell.
    pub fn column(self) -> usize {
        self.index % self.size
    }

    /// The 0-based row and column of the cell.
    pub fn rc(self) -> (usize, usize) {
        (self.row(), self.column())
    }

    /// The [`CandidateIndex`] of a value in this cell.
    pub fn candidate(self, value: usize) -> CandidateIndex {
        CandidateIndex::from_cv(self, value)
    }

    /// The cell offset by `(dr, dc)`, or `None` when that lands off the board.
    ///
    /// # Example
    /// ```
    /// # use variant_solver_lib::cell_index::CellIndex;
    /// let cell = CellIndex::from_rc(0, 0, 9);
    /// assert_eq!(cell.offset(1, 2), Some(CellIndex::from_rc(1, 2, 9)));
    /// assert_eq!(cell.offset(-1, 0), None);
    /// ```
    pub fn offset(self, dr: isize, dc: isize) -> Option<CellIndex> {
        let row = self.row() as isize + dr;
        let col = self.column() as isize + dc;
        if row < 0 || col < 0 || row >= self.size as isize || col >= self.size as isize {
            None
        } else {
            Some(CellIndex::from_rc(row as usize, col as usize, self.size))
        }
    }

    /// The orthogonally adjacent cells, in reading order.
    pub fn orthogonal_neighbors(self) -> Vec<CellIndex> {
        [(-1, 0), (0, -1), (0, 1), (1, 0)]
            .iter()
            .filter_map(|&(dr, dc)| self.offset(dr, dc))
            .collect()
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row() + 1, self.column() + 1)
    }
}

impl PartialEq for CellIndex {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for CellIndex {}

impl Ord for CellIndex {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl PartialOrd for CellIndex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for CellIndex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rc_math() {
        assert_eq!(CellIndex::from_rc(0, 0, 9).index(), 0);
        assert_eq!(CellIndex::from_rc(1, 2, 9).index(), 11);
        assert_eq!(CellIndex::new(80, 9).rc(), (8, 8));
        assert_eq!(CellIndex::new(40, 9).to_string(), "r5c5");
    }

    #[test]
    fn test_neighbors() {
        let corner = CellIndex::from_rc(0, 0, 9);
        assert_eq!(corner.orthogonal_neighbors().len(), 2);
        let center = CellIndex::from_rc(4, 4, 9);
        assert_eq!(center.orthogonal_neighbors().len(), 4);
        assert_eq!(center.offset(2, -1), Some(CellIndex::from_rc(6, 3, 9)));
        assert_eq!(CellIndex::from_rc(8, 8, 9).offset(1, 0), None);
    }
}
