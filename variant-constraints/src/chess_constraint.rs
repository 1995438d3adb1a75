//! Contains the [`ChessConstraint`] struct for chess-move exclusion rules.

use variant_solver_lib::prelude::*;

/// A [`Constraint`] forbidding equal digits a chess move apart.
///
/// Reduces entirely to weak links between same-value candidates at each
/// offset, installed at initialization.
#[derive(Debug)]
pub struct ChessConstraint {
    specific_name: String,
    offsets: Vec<(isize, isize)>,
}

impl ChessConstraint {
    /// Creates a constraint with arbitrary offsets.
    pub fn new(specific_name: &str, offsets: Vec<(isize, isize)>) -> Self {
        Self { specific_name: specific_name.to_owned(), offsets }
    }

    /// Creates a constraint from one offset plus all its reflections.
    pub fn from_symmetric_offset(specific_name: &str, offset: (isize, isize)) -> Self {
        let (dr, dc) = offset;
        let mut offsets = vec![(dr, dc), (dc, dr)];
        if dr != 0 {
            offsets.push((-dr, dc));
            offsets.push((dc, -dr));
        }
        if dc != 0 {
            offsets.push((dr, -dc));
            offsets.push((-dc, dr));
        }
        if dr != 0 && dc != 0 {
            offsets.push((-dr, -dc));
            offsets.push((-dc, -dr));
        }
        Self::new(specific_name, offsets)
    }

    /// The standard anti-king constraint.
    pub fn anti_king() -> Self {
        Self::from_symmetric_offset("Anti-King", (1, 1))
    }

    /// The standard anti-knight constraint.
    pub fn anti_knight() -> Self {
        Self::from_symmetric_offset("Anti-Knight", (1, 2))
    }
}

impl Constraint for ChessConstraint {
    fn name(&self) -> &str {
        "Chess"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let size = board.size();
        let cu = board.cell_utility();
        let mut result = LogicResult::None;
        for cell in cu.all_cells() {
            for &(dr, dc) in &self.offsets {
                if let Some(other) = cell.offset(dr, dc) {
                    for value in 1..=size {
                        result = result
                            .combine(board.add_weak_link(cell.candidate(value), other.candidate(value)));
                        if result.is_invalid() {
                            return InitResult::invalid();
                        }
                    }
                }
            }
        }
        InitResult::from(result).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_anti_knight_links() {
        let mut board = Board::new(9);
        board.add_constraint(Arc::new(ChessConstraint::anti_knight()));
        board.finalize_constraints().unwrap();

        // Every on-board knight destination is linked for every value.
        let offsets: [(isize, isize); 8] =
            [(1, 2), (2, 1), (-1, 2), (2, -1), (1, -2), (-2, 1), (-1, -2), (-2, -1)];
        for cell in board.all_cells() {
            for (dr, dc) in offsets {
                if let Some(other) = cell.offset(dr, dc) {
                    for value in 1..=9 {
                        assert!(board.is_weak_link(cell.candidate(value), other.candidate(value)));
                        assert!(board.is_weak_link(other.candidate(value), cell.candidate(value)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_anti_king_eliminates_diagonal() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        board.add_constraint(Arc::new(ChessConstraint::anti_king()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cu.cell(4, 4), 7);
        assert!(!board.cell(cu.cell(3, 3)).has(7));
        assert!(!board.cell(cu.cell(5, 5)).has(7));
        assert!(board.cell(cu.cell(6, 6)).has(7));
    }
}
