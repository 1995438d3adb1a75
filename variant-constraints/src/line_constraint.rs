//! Contains the [`LineConstraint`] struct covering the line rules that
//! reduce to weak links: thermometers, whispers, renban, palindromes,
//! modular and entropic lines, and nabner lines.

use variant_solver_lib::prelude::*;

/// Which line rule applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Values strictly increase along the line.
    Thermometer,
    /// Adjacent values differ by at least the gap.
    Whispers(usize),
    /// The values form a consecutive, non-repeating run.
    Renban,
    /// Mirrored cells hold equal values.
    Palindrome,
    /// Any window of `modulus` consecutive cells has pairwise distinct
    /// residues.
    Modular(usize),
    /// Any window of three consecutive cells covers the low, middle, and
    /// high thirds of the value range.
    Entropic,
    /// No two values anywhere on the line are equal or consecutive.
    Nabner,
}

/// A [`Constraint`] for one line of cells. Initialization translates the
/// rule into candidate pair exclusions (plus outright eliminations for
/// values the rule leaves no room for) and removes itself.
pub struct LineConstraint {
    specific_name: String,
    kind: LineKind,
    cells: Vec<CellIndex>,
}

impl LineConstraint {
    pub fn new(kind: LineKind, cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() < 2 {
            return Err("a line needs at least two cells".to_owned());
        }
        let label = match &kind {
            LineKind::Thermometer => "Thermometer",
            LineKind::Whispers(_) => "Whispers",
            LineKind::Renban => "Renban",
            LineKind::Palindrome => "Palindrome",
            LineKind::Modular(_) => "Modular Line",
            LineKind::Entropic => "Entropic Line",
            LineKind::Nabner => "Nabner",
        };
        let specific_name = format!("{} at {}", label, cells[0]);
        Ok(Self { specific_name, kind, cells })
    }

    pub fn thermometer(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Thermometer, cells)
    }

    /// German whispers: adjacent cells differ by at least half the board.
    pub fn whispers(cells: Vec<CellIndex>, size: usize) -> Result<Self, String> {
        Self::new(LineKind::Whispers((size + 1) / 2), cells)
    }

    pub fn renban(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Renban, cells)
    }

    pub fn palindrome(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Palindrome, cells)
    }

    pub fn modular(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Modular(3), cells)
    }

    pub fn entropic(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Entropic, cells)
    }

    pub fn nabner(cells: Vec<CellIndex>) -> Result<Self, String> {
        Self::new(LineKind::Nabner, cells)
    }

    fn pairs(&self, size: usize) -> Vec<(CandidateIndex, CandidateIndex)> {
        let cells = &self.cells;
        let len = cells.len();
        let mut pairs = Vec::new();

        match &self.kind {
            LineKind::Thermometer => {
                for i in 0..len {
                    for j in i + 1..len {
                        pairs.extend(lt_pairs(cells[i], cells[j], j - i, size));
                    }
                    // Position bounds: i values below, len-1-i above.
                    let allowed = ValueMask::from_between_inclusive(i + 1, size - (len - 1 - i), size);
                    for value in (!allowed & ValueMask::from_all_values(size)).to_vec() {
                        let candidate = cells[i].candidate(value);
                        pairs.push((candidate, candidate));
                    }
                }
            }
            LineKind::Whispers(gap) => {
                for window in cells.windows(2) {
                    for va in 1..=size {
                        for vb in 1..=size {
                            if va.abs_diff(vb) < *gap {
                                pairs.push((window[0].candidate(va), window[1].candidate(vb)));
                            }
                        }
                    }
                }
                // Values with no partner at the required distance.
                for &cell in cells {
                    for value in 1..=size {
                        if value <= *gap && value + *gap > size {
                            let candidate = cell.candidate(value);
                            pairs.push((candidate, candidate));
                        }
                    }
                }
            }
            LineKind::Renban => {
                for i in 0..len {
                    for j in i + 1..len {
                        for va in 1..=size {
                            for vb in 1..=size {
                                if va == vb || va.abs_diff(vb) >= len {
                                    pairs.push((cells[i].candidate(va), cells[j].candidate(vb)));
                                }
                            }
                        }
                    }
                }
            }
            LineKind::Palindrome => {
                for i in 0..len / 2 {
                    pairs.extend(eq_pairs(cells[i], cells[len - 1 - i], size));
                }
            }
            LineKind::Modular(modulus) => {
                for i in 0..len {
                    for j in i + 1..(i + modulus).min(len) {
                        for va in 1..=size {
                            for vb in 1..=size {
                                if va % modulus == vb % modulus {
                                    pairs.push((cells[i].candidate(va), cells[j].candidate(vb)));
                                }
                            }
                        }
                    }
                }
            }
            LineKind::Entropic => {
                let band = |value: usize| (value - 1) / ((size + 2) / 3);
                for i in 0..len {
                    for j in i + 1..(i + 3).min(len) {
                        for va in 1..=size {
                            for vb in 1..=size {
                                if band(va) == band(vb) {
                                    pairs.push((cells[i].candidate(va), cells[j].candidate(vb)));
                                }
                            }
                        }
                    }
                }
            }
            LineKind::Nabner => {
                for i in 0..len {
                    for j in i + 1..len {
                        for va in 1..=size {
                            for vb in 1..=size {
                                if va.abs_diff(vb) <= 1 {
                                    pairs.push((cells[i].candidate(va), cells[j].candidate(vb)));
                                }
                            }
                        }
                    }
                }
            }
        }
        pairs
    }
}

impl Constraint for LineConstraint {
    fn name(&self) -> &str {
        "Line"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let mut result = LogicResult::None;
        for (a, b) in self.pairs(board.size()) {
            result = result.combine(board.add_weak_link(a, b));
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

    fn row_cells(cu: CellUtility, len: usize) -> Vec<CellIndex> {
        (0..len).map(|col| cu.cell(0, col)).collect()
    }

    #[test]
    fn test_thermometer_bounds() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 4);
        board.add_constraint(Arc::new(LineConstraint::thermometer(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        // Bulb at least 1, tip at least 4; each position windowed.
        assert_eq!(board.cell(cells[0]), ValueMask::from_between_inclusive(1, 6, 9));
        assert_eq!(board.cell(cells[3]), ValueMask::from_between_inclusive(4, 9, 9));

        board.set_as_given(cells[1], 3);
        // Strict increase pushes the tail up and the bulb down.
        assert_eq!(board.cell(cells[0]), ValueMask::from_values(&[1, 2]));
        assert!(board.cell(cells[2]).min() >= 4);
    }

    #[test]
    fn test_whispers_gap() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 3);
        board.add_constraint(Arc::new(LineConstraint::whispers(cells.clone(), 9).unwrap()));
        board.finalize_constraints().unwrap();
        // 5 has no partner at distance 5 on a 9-board.
        for &cell in &cells {
            assert!(!board.cell(cell).has(5));
        }
        board.set_as_given(cells[0], 4);
        // Neighbors must be 9 (diff >= 5 from 4, and 4 itself is gone).
        assert_eq!(board.cell(cells[1]).value(), 9);
    }

    #[test]
    fn test_renban_window() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 3);
        board.add_constraint(Arc::new(LineConstraint::renban(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 5);
        // A 3-long consecutive run containing 5 stays within 3..7.
        for &cell in &cells[1..] {
            assert_eq!(board.cell(cell), ValueMask::from_values(&[3, 4, 6, 7]));
        }
    }

    #[test]
    fn test_palindrome_mirror() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = vec![cu.cell(0, 0), cu.cell(1, 1), cu.cell(2, 2), cu.cell(3, 2)];
        board.add_constraint(Arc::new(LineConstraint::palindrome(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 8);
        assert_eq!(board.cell(cells[3]).value(), 8);
    }

    #[test]
    fn test_modular_triplets() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 3);
        board.add_constraint(Arc::new(LineConstraint::modular(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 1);
        // Cells within distance 2 drop the whole residue class {1,4,7}.
        assert_eq!(board.cell(cells[1]), ValueMask::from_values(&[2, 3, 5, 6, 8, 9]));
        assert_eq!(board.cell(cells[2]), ValueMask::from_values(&[2, 3, 5, 6, 8, 9]));
    }

    #[test]
    fn test_entropic_bands() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 3);
        board.add_constraint(Arc::new(LineConstraint::entropic(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 2);
        // The rest of the window leaves the low band entirely.
        assert_eq!(board.cell(cells[1]), ValueMask::from_higher(3, 9));
        assert_eq!(board.cell(cells[2]), ValueMask::from_higher(3, 9));
    }

    #[test]
    fn test_nabner_no_consecutive_anywhere() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = row_cells(cu, 3);
        board.add_constraint(Arc::new(LineConstraint::nabner(cells.clone()).unwrap()));
        board.finalize_constraints().unwrap();
        board.set_as_given(cells[0], 5);
        // 4, 5, 6 are dead on every other line cell, adjacent or not.
        for &cell in &cells[1..] {
            assert_eq!(board.cell(cell), ValueMask::from_values(&[1, 2, 3, 7, 8, 9]));
        }
    }

    #[test]
    fn test_too_short_rejected() {
        let cu = CellUtility::new(9);
        assert!(LineConstraint::thermometer(vec![cu.cell(0, 0)]).is_err());
    }
}
