//! Contains [`EliminationList`] for collecting and describing eliminated
//! candidates.

use crate::prelude::*;
use itertools::Itertools;
use std::{collections::BTreeSet, fmt::Display};

/// An ordered set of candidates to eliminate, with a compact human-readable
/// rendering (`-5r1c23`).
#[derive(Clone, Default)]
pub struct EliminationList {
    candidates: BTreeSet<CandidateIndex>,
}

impl EliminationList {
    pub fn new() -> EliminationList {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, candidate: CandidateIndex) -> bool {
        self.candidates.contains(&candidate)
    }

    pub fn iter(&self) -> impl Iterator<Item = CandidateIndex> + '_ {
        self.candidates.iter().copied()
    }

    /// Adds a candidate.
    pub fn add(&mut self, candidate: CandidateIndex) {
        self.candidates.insert(candidate);
    }

    /// Adds every candidate of the slice.
    pub fn add_all(&mut self, candidates: &[CandidateIndex]) {
        self.candidates.extend(candidates.iter());
    }

    /// Adds a candidate by cell and value.
    pub fn add_cell_value(&mut self, cell: CellIndex, value: usize) {
        self.add(cell.candidate(value));
    }

    /// Executes the eliminations on a board.
    ///
    /// # Example
    /// ```
    /// # use variant_solver_lib::prelude::*;
    /// let mut board = Board::new(9);
    /// let cu = CellUtility::new(9);
    /// let mut elims = EliminationList::new();
    /// elims.add_cell_value(cu.cell(0, 0), 1);
    /// assert!(elims.execute(&mut board).is_changed());
    /// assert!(!board.cell(cu.cell(0, 0)).has(1));
    /// assert!(elims.execute(&mut board).is_none());
    /// ```
    pub fn execute(&self, board: &mut Board) -> LogicResult {
        let mut result = LogicResult::None;
        for &candidate in self.candidates.iter() {
            if board.has_candidate(candidate) {
                result = result.combine(board.clear_candidate(candidate));
                if result.is_invalid() {
                    return result;
                }
            }
        }
        result
    }
}

impl From<Vec<CandidateIndex>> for EliminationList {
    fn from(candidates: Vec<CandidateIndex>) -> Self {
        Self { candidates: candidates.into_iter().collect() }
    }
}

impl FromIterator<CandidateIndex> for EliminationList {
    fn from_iter<I: IntoIterator<Item = CandidateIndex>>(iter: I) -> EliminationList {
        EliminationList { candidates: iter.into_iter().collect() }
    }
}

impl Display for EliminationList {
    /// Formats as `-{value}{cells}` groups joined by semicolons, for
    /// example `-1r1c1;-2r12c1`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.candidates.is_empty() {
            return write!(f, "No eliminations");
        }

        let size = self.candidates.iter().next().unwrap().size();
        let cu = CellUtility::new(size);
        let mut cells_by_value: Vec<Vec<CellIndex>> = vec![vec![]; size];
        for &candidate in self.candidates.iter() {
            let (cell, value) = candidate.cell_and_value();
            cells_by_value[value - 1].push(cell);
        }

        let desc = (1..=size)
            .filter(|&value| !cells_by_value[value - 1].is_empty())
            .map(|value| format!("-{}{}", value, cu.compact_name(&cells_by_value[value - 1])))
            .join(";");
        write!(f, "{}", desc)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let cu = CellUtility::new(9);
        let mut elims = EliminationList::new();
        assert_eq!(elims.to_string(), "No eliminations");

        elims.add_cell_value(cu.cell(0, 0), 1);
        assert_eq!(elims.to_string(), "-1r1c1");

        elims.add_cell_value(cu.cell(3, 4), 3);
        elims.add_cell_value(cu.cell(3, 5), 3);
        assert_eq!(elims.to_string(), "-1r1c1;-3r4c56");
    }

    #[test]
    fn test_execute_invalid() {
        let mut board = Board::new(9);
        let cu = CellUtility::new(9);
        let elims: EliminationList = (1..=9).map(|v| cu.cell(0, 0).candidate(v)).collect();
        assert!(elims.execute(&mut board).is_invalid());
    }
}
