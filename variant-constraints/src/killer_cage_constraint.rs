//! Contains the [`KillerCageConstraint`] struct.

use crate::fixed_sum_constraint::FixedSumConstraint;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A [`Constraint`] for a killer cage: the cells are pairwise distinct and,
/// when a total is clued, sum to it.
///
/// Initialization registers a killer region for the distinctness and hands
/// the total to a [`FixedSumConstraint`], then removes itself.
pub struct KillerCageConstraint {
    specific_name: String,
    cells: Vec<CellIndex>,
    sum: Option<usize>,
}

impl KillerCageConstraint {
    pub fn new(size: usize, cells: Vec<CellIndex>, sum: Option<usize>) -> Result<Self, String> {
        let cu = CellUtility::new(size);
        let specific_name = format!("Killer Cage at {}", cu.compact_name(&cells));
        if cells.is_empty() {
            return Err(format!("{}: empty cage", specific_name));
        }
        if cells.len() > size {
            return Err(format!("{}: more than {} cells cannot stay distinct", specific_name, size));
        }
        let mut sorted = cells.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != cells.len() {
            return Err(format!("{}: duplicate cells", specific_name));
        }
        Ok(Self { specific_name, cells, sum })
    }
}

impl Constraint for KillerCageConstraint {
    fn name(&self) -> &str {
        "Killer Cage"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let region = Region::from_constraint(
            &self.specific_name,
            &self.cells,
            RegionKind::Killer,
            &self.specific_name,
        );
        let result = board.add_region(region);
        if result.is_invalid() {
            return InitResult::invalid();
        }

        let mut add: Vec<Arc<dyn Constraint>> = Vec::new();
        if let Some(sum) = self.sum {
            add.push(Arc::new(FixedSumConstraint::with_name(
                board,
                &self.specific_name,
                &self.cells,
                sum,
            )));
        }
        InitResult::from(result).with_constraints(add).and_delete_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cage_six() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        let cells = vec![cu.cell(0, 0), cu.cell(0, 1), cu.cell(0, 2)];
        let cage = KillerCageConstraint::new(9, cells.clone(), Some(6)).unwrap();
        board.add_constraint(Arc::new(cage));
        board.finalize_constraints().unwrap();
        assert!(board.propagate().is_changed());
        for &cell in &cells {
            assert_eq!(board.cell(cell), ValueMask::from_values(&[1, 2, 3]));
        }
        // The cage's distinctness is on the board as a region.
        assert!(board.regions().iter().any(|r| *r.kind() == RegionKind::Killer));
        // Weak links exclude 3 from a cage peer once 3 is placed.
        board.set_as_given(cells[0], 3);
        assert!(!board.cell(cells[1]).has(3));
    }

    #[test]
    fn test_cage_distinctness_without_sum() {
        let mut board = Board::new(9);
        let cu = board.cell_utility();
        // An L-shaped cage spanning two rows, no total clued.
        let cells = vec![cu.cell(0, 0), cu.cell(1, 0), cu.cell(1, 1)];
        let cage = KillerCageConstraint::new(9, cells.clone(), None).unwrap();
        board.add_constraint(Arc::new(cage));
        board.finalize_constraints().unwrap();
        assert!(board.share_region(cells[0], cells[2]));
    }

    #[test]
    fn test_oversized_cage_rejected() {
        let cu = CellUtility::new(4);
        let cells: Vec<CellIndex> = (0..5).map(|i| cu.cell_index(i)).collect();
        assert!(KillerCageConstraint::new(4, cells, Some(10)).is_err());
    }

    #[test]
    fn test_duplicate_cells_rejected() {
        let cu = CellUtility::new(9);
        let cells = vec![cu.cell(0, 0), cu.cell(0, 0)];
        assert!(KillerCageConstraint::new(9, cells, None).is_err());
    }
}
