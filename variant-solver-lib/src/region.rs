//! Contains [`Region`] for representing a group of mutually distinct cells.

use crate::prelude::*;

/// The kind of a region, used for deduplication and for telling full
/// houses apart from partial distinctness groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Row,
    Col,
    Box,
    Diagonal,
    DisjointGroup,
    Killer,
    Extra,
    Custom(String),
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Row => write!(f, "row"),
            RegionKind::Col => write!(f, "col"),
            RegionKind::Box => write!(f, "region"),
            RegionKind::Diagonal => write!(f, "diagonal"),
            RegionKind::DisjointGroup => write!(f, "disjointgroup"),
            RegionKind::Killer => write!(f, "killer"),
            RegionKind::Extra => write!(f, "extraregion"),
            RegionKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A group of cells that must hold pairwise distinct values.
///
/// A region of exactly N cells on an NxN board is *full*: every value
/// appears in it exactly once. Smaller regions (killer cages and similar)
/// only assert distinctness.
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    cells: Vec<CellIndex>,
    kind: RegionKind,
    from_constraint: Option<String>,
}

impl Region {
    /// Creates a new region. The cells are stored sorted.
    pub fn new(name: &str, cells: &[CellIndex], kind: RegionKind) -> Region {
        let mut cells = cells.to_vec();
        cells.sort();
        Region { name: name.to_string(), cells, kind, from_constraint: None }
    }

    /// Creates a region recording the constraint that produced it.
    pub fn from_constraint(name: &str, cells: &[CellIndex], kind: RegionKind, source: &str) -> Region {
        let mut region = Self::new(name, cells, kind);
        region.from_constraint = Some(source.to_string());
        region
    }

    /// The display name of the region.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cells of the region, sorted by index.
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    /// The kind tag of the region.
    pub fn kind(&self) -> &RegionKind {
        &self.kind
    }

    /// The specific name of the constraint that created this region, if any.
    pub fn source(&self) -> Option<&str> {
        self.from_constraint.as_deref()
    }

    /// Whether the region covers every value of the board exactly once.
    pub fn is_full(&self, size: usize) -> bool {
        self.cells.len() == size
    }

    /// Whether the region contains the cell.
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Whether another region covers the same cell set with the same kind.
    pub fn same_as(&self, other: &Region) -> bool {
        self.kind == other.kind && self.cells == other.cells
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_region() {
        let cu = CellUtility::new(9);
        let cells = vec![cu.cell(0, 2), cu.cell(0, 0), cu.cell(0, 1)];
        let region = Region::new("Cage at r1c1", &cells, RegionKind::Killer);
        assert_eq!(region.cells(), &[cu.cell(0, 0), cu.cell(0, 1), cu.cell(0, 2)]);
        assert!(region.contains(cu.cell(0, 1)));
        assert!(!region.contains(cu.cell(1, 1)));
        assert!(!region.is_full(9));
        assert!(region.is_full(3));

        let dup = Region::new("other name", &cells, RegionKind::Killer);
        assert!(region.same_as(&dup));
        let other_kind = Region::new("Cage at r1c1", &cells, RegionKind::Extra);
        assert!(!region.same_as(&other_kind));
    }
}
