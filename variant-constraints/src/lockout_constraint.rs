//! Contains the [`LockoutConstraint`] struct.

use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a lockout line: the two diamond ends differ by at
/// least half the board, and no cell between them holds a value inside the
/// ends' closed range.
///
/// The end gap is pairwise and becomes weak links at initialization. A
/// middle cell's legality depends on *both* ends at once, which no binary
/// exclusion can express, so the middle filtering stays in `logical_step`.
pub struct LockoutConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    gap: usize,
}

impl LockoutConstraint {
    pub fn new(size: usize, cells: Vec<CellIndex>) -> Result<Self, String> {
        if cells.len() < 3 {
            return Err("a lockout line needs a cell between its diamonds".to_owned());
        }
        let specific_name = format!("Lockout at {}", cells[0]);
        Ok(Self { specific_name, cells, gap: size / 2 })
    }

    fn ends(&self) -> (CellIndex, CellIndex) {
        (self.cells[0], *self.cells.last().unwrap())
    }

    /// Values of a middle cell compatible with some legal end pair.
    fn allowed_middle_mask(&self, board: &Board) -> ValueMask {
        let (e1, e2) = self.ends();
        let mask1 = board.cell(e1);
        let mask2 = board.cell(e2);
        let size = board.size();

        let mut allowed = ValueMask::new();
        for a in mask1 {
            for b in mask2 {
                if a.abs_diff(b) < self.gap {
                    continue;
                }
                let (low, high) = (a.min(b), a.max(b));
                allowed = allowed
                    | ValueMask::from_lower(low)
                    | ValueMask::from_higher(high, size);
            }
        }
        allowed
    }
}

impl Constraint for LockoutConstraint {
    fn name(&self) -> &str {
        "Lockout"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let (e1, e2) = self.ends();
        let size = board.size();
        let mut result = LogicResult::None;
        for a in 1..=size {
            for b in 1..=size {
                if a.abs_diff(b) < self.gap {
                    result = result.combine(board.add_weak_link(e1.candidate(a), e2.candidate(b)));
                    if result.is_invalid() {
                        return InitResult::invalid();
                    }
                }
            }
        }
        InitResult::from(result)
    }

    fn enforce(&self, board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        let (e1, e2) = self.ends();
        let (m1, m2) = (board.cell(e1), board.cell(e2));
        if !(m1.is_given() && m2.is_given()) {
            return true;
        }
        let (a, b) = (m1.value(), m2.value());
        if a.abs_diff(b) < self.gap {
            return false;
        }
        let (low, high) = (a.min(b), a.max(b));
        for &cell in &self.cells[1..self.cells.len() - 1] {
            let mask = board.cell(cell);
            if mask.is_given() && mask.value() >= low && mask.value() <= high {
                return false;
            }
        }
        true
    }

    fn logical_step(&self, board: &mut Board) -> Vec<Deduction> {
        let allowed = self.allowed_middle_mask(board);
        if allowed.is_empty() {
            return vec![Deduction::Invalid(format!(
                "the diamonds of {} have no legal pair left",
                self.specific_name
            ))];
        }

        let mut eliminations = Vec::new();
        for &cell in &self.cells[1..self.cells.len() - 1] {
            let removed = board.cell(cell).value_bits() & !allowed.value_bits();
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
