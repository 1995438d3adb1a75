//! Contains the [`RegionConstraint`] struct for adding extra regions to the
//! board.

use variant_solver_lib::prelude::*;

/// A [`Constraint`] that registers one region (extra region, diagonal,
/// disjoint group) during initialization and then removes itself. The
/// region's pairwise weak links carry the rule from there.
#[derive(Debug)]
pub struct RegionConstraint {
    specific_name: String,
    region: Region,
}

impl RegionConstraint {
    pub fn new(specific_name: &str, region: Region) -> Self {
        Self { specific_name: specific_name.to_owned(), region }
    }

    /// An extra region over arbitrary cells.
    pub fn extra_region(cells: &[CellIndex]) -> Self {
        let name = format!("Extra Region at {}", cells[0]);
        Self::new(&name, Region::new(&name, cells, RegionKind::Extra))
    }

    /// The positive (bottom-left to top-right) diagonal.
    pub fn diagonal_positive(size: usize) -> Self {
        let cu = CellUtility::new(size);
        let cells: Vec<CellIndex> = (0..size).map(|i| cu.cell(size - i - 1, i)).collect();
        Self::new("Diagonal+", Region::new("Diagonal+", &cells, RegionKind::Diagonal))
    }

    /// The negative (top-left to bottom-right) diagonal.
    pub fn diagonal_negative(size: usize) -> Self {
        let cu = CellUtility::new(size);
        let cells: Vec<CellIndex> = (0..size).map(|i| cu.cell(i, i)).collect();
        Self::new("Diagonal-", Region::new("Diagonal-", &cells, RegionKind::Diagonal))
    }

    /// One disjoint-group region per box position: the k-th cell of every
    /// box forms a group.
    pub fn disjoint_groups(size: usize, boxes: &[usize]) -> Vec<Self> {
        let cu = CellUtility::new(size);
        let mut cells_by_box: Vec<Vec<CellIndex>> = vec![Vec::new(); size];
        for cell in cu.all_cells() {
            let box_id = boxes[cell.index()];
            if box_id < size {
                cells_by_box[box_id].push(cell);
            }
        }

        let mut result = Vec::new();
        for position in 0..size {
            let group: Vec<CellIndex> = cells_by_box
                .iter()
                .filter(|cells| cells.len() == size)
                .map(|cells| cells[position])
                .collect();
            if group.len() == size {
                let name = format!("Disjoint Group {}", position + 1);
                result.push(Self::new(&name, Region::new(&name, &group, RegionKind::DisjointGroup)));
            }
        }
        result
    }
}

impl Constraint for RegionConstraint {
    fn name(&self) -> &str {
        "Region"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn init(&self, board: &mut Board) -> InitResult {
        let result = board.add_region(self.region.clone());
        if result.is_invalid() {
            return InitResult::invalid();
        }
        InitResult::from(result).and_delete_self()
    }
}
