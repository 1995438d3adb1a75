//! Contains the [`OrthogonalPairsConstraint`] struct for adjacent-pair
//! rules: differences, ratios, sums (XV), and their negative constraints.

use std::collections::HashSet;
use variant_solver_lib::prelude::*;

/// The relation a pair marker asserts between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairType {
    /// The two cells sum to the value.
    Sum(usize),
    /// The two cells differ by exactly the value.
    Diff(usize),
    /// One cell is the other times the value.
    Ratio(usize),
}

impl PairType {
    /// The partners each value may sit next to under this relation.
    pub fn allowed_partners(self, value: usize, size: usize) -> ValueMask {
        let mut mask = ValueMask::new();
        for other in 1..=size {
            let allowed = match self {
                PairType::Sum(n) => value + other == n,
                PairType::Diff(n) => value + n == other || other + n == value,
                PairType::Ratio(n) => value * n == other || other * n == value,
            };
            if allowed {
                mask = mask.with(other);
            }
        }
        mask
    }
}

impl std::fmt::Display for PairType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairType::Sum(n) => write!(f, "sum {}", n),
            PairType::Diff(n) => write!(f, "difference {}", n),
            PairType::Ratio(n) => write!(f, "ratio {}", n),
        }
    }
}

/// One marked pair of orthogonally adjacent cells.
#[derive(Debug, Clone, Copy)]
pub struct PairMarker {
    pub pair_type: PairType,
    pub cell0: CellIndex,
    pub cell1: CellIndex,
}

impl PairMarker {
    pub fn new(pair_type: PairType, cell0: CellIndex, cell1: CellIndex) -> Self {
        Self { pair_type, cell0, cell1 }
    }
}

/// A [`Constraint`] for marked orthogonal pairs plus optional negative
/// constraints: every *unmarked* orthogonal pair must not satisfy any of
/// the negative relations. A nonconsecutive rule is the negative
/// [`PairType::Diff`]`(1)` with no markers.
///
/// Reduces entirely to weak links installed at initialization.
#[derive(Debug)]
pub struct OrthogonalPairsConstraint {
    specific_name: String,
    markers: Vec<PairMarker>,
    negatives: Vec<PairType>,
}

impl OrthogonalPairsConstraint {
    pub fn new(specific_name: &str, markers: Vec<PairMarker>, negatives: Vec<PairType>) -> Self {
        Self { specific_name: specific_name.to_owned(), markers, negatives }
    }

    /// The nonconsecutive rule over the whole grid.
    pub fn nonconsecutive() -> Self {
        Self::new("Nonconsecutive", Vec::new(), vec![PairType::Diff(1)])
    }

    fn marker_links(&self, board: &mut Board) -> LogicResult {
        let size = board.size();
        let mut result = LogicResult::None;
        for marker in &self.markers {
            for value in 1..=size {
                let partners = marker.pair_type.allowed_partners(value, size).without(value);
                if partners.is_empty() {
                    // The value cannot sit on this marker at all.
                    for cell in [marker.cell0, marker.cell1] {
                        let candidate = cell.candidate(value);
                        result = result.combine(board.add_weak_link(candidate, candidate));
                        if result.is_invalid() {
                            return result;
                        }
                    }
                    continue;
                }
                let forbidden = !partners & board.all_values();
                for other in forbidden {
                    result = result
                        .combine(board.add_weak_link(marker.cell0.candidate(value), marker.cell1.candidate(other)))
                        .combine(board.add_weak_link(marker.cell1.candidate(value), marker.cell0.candidate(other)));
                    if result.is_invalid() {
                        return result;
                    }
                }
            }
        }
        result
    }

    fn negative_links(&self, board: &mut Board) -> LogicResult {
        let size = board.size();
        let mut marked: HashSet<(CellIndex, CellIndex)> = HashSet::new();
        for marker in &self.markers {
            let key = if marker.cell0 < marker.cell1 {
                (marker.cell0, marker.cell1)
            } else {
                (marker.cell1, marker.cell0)
            };
            marked.insert(key);
        }

        let mut combined = vec![ValueMask::new(); size];
        for negative in &self.negatives {
            for value in 1..=size {
                combined[value - 1] = combined[value - 1] | negative.allowed_partners(value, size);
            }
        }

        let mut result = LogicResult::None;
        for cell0 in board.cell_utility().all_cells() {
            for cell1 in cell0.orthogonal_neighbors() {
                if cell0 > cell1 || marked.contains(&(cell0, cell1)) {
                    continue;
                }
                for value in 1..=size {
                    // Off-marker, the relation partners are the forbidden ones.
                    let forbidden = combined[value - 1].without(value);
                    for other in forbidden {
                        result = result
                            .combine(board.add_weak_link(cell0.candidate(value), cell1.candidate(other)))
                            .combine(board.add_weak_link(cell1.candidate(value), cell0.candidate(other)));
                        if result.is_invalid() {
                            return result;
                        }
                    }
                }
            }
        }
        result
    }
}

impl Constraint for OrthogonalPairsConstraint {
    fn name(&self) -> &str {
        "Orthogonal Pairs"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let mut result = self.marker_links(board);
        if result.is_invalid() {
            return InitResult::invalid();
        }
        if !self.negatives.is_empty() {
            result = result.combine(self.negative_links(board));
            if result.is_invalid() {
                return InitResult::invalid();
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
    fn test_sum_marker() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let marker = PairMarker::new(PairType::Sum(5), cu.cell(0, 0), cu.cell(0, 1));
        board.add_constraint(Arc::new(OrthogonalPairsConstraint::new("V at r1c12", vec![marker], vec![])));
        board.finalize_constraints().unwrap();
        // Only 1..4 have partners under sum 5.
        assert_eq!(board.cell(cu.cell(0, 0)), ValueMask::from_lower_equal(4));
        assert_eq!(board.cell(cu.cell(0, 1)), ValueMask::from_lower_equal(4));

        board.set_as_given(cu.cell(0, 0), 2);
        assert!(board.cell(cu.cell(0, 1)).is_given());
        assert_eq!(board.cell(cu.cell(0, 1)).value(), 3);
    }

    #[test]
    fn test_ratio_marker() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let marker = PairMarker::new(PairType::Ratio(2), cu.cell(3, 3), cu.cell(3, 4));
        board.add_constraint(Arc::new(OrthogonalPairsConstraint::new("Ratio at r4c45", vec![marker], vec![])));
        board.finalize_constraints().unwrap();
        // 5, 7, 9 have no doubling partner within 1..9.
        let mask = board.cell(cu.cell(3, 3));
        assert!(!mask.has(5) && !mask.has(7) && !mask.has(9));
        assert!(mask.has(1) && mask.has(8));
    }

    #[test]
    fn test_nonconsecutive() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        board.add_constraint(Arc::new(OrthogonalPairsConstraint::nonconsecutive()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cu.cell(4, 4), 5);
        for neighbor in cu.cell(4, 4).orthogonal_neighbors() {
            assert!(!board.cell(neighbor).has(4));
            assert!(!board.cell(neighbor).has(6));
        }
        // Diagonal cells are unaffected.
        assert!(board.cell(cu.cell(3, 3)).has(4));
    }
}
