//! Contains [`CandidateLinks`], one adjacency row of the weak-link graph.

use crate::prelude::*;
use bitvec::prelude::*;

/// The set of candidates linked to one candidate.
///
/// Backed by a `BitVec` indexed by candidate index, so that cell forcing
/// and subboard lift-up reduce to row-wise boolean operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateLinks {
    links: BitVec,
    size: usize,
}

impl CandidateLinks {
    /// Creates an empty row for the given board size.
    pub fn new(size: usize) -> Self {
        let num_candidates = size * size * size;
        Self { links: bitvec!(0; num_candidates), size }
    }

    /// True when the candidate is linked.
    pub fn is_linked(&self, candidate: CandidateIndex) -> bool {
        self.links[candidate.index()]
    }

    /// True when no candidates are linked.
    pub fn is_empty(&self) -> bool {
        self.links.not_any()
    }

    /// The number of linked candidates.
    pub fn count(&self) -> usize {
        self.links.count_ones()
    }

    /// Sets the link status for the candidate.
    ///
    /// Returns true if the status changed.
    pub fn set(&mut self, candidate: CandidateIndex, value: bool) -> bool {
        if self.links[candidate.index()] == value {
            return false;
        }
        self.links.set(candidate.index(), value);
        true
    }

    /// Adds every link from `other` into this row.
    pub fn union(&mut self, other: &Self) {
        self.links |= &other.links;
    }

    /// Keeps only links present in both rows.
    pub fn intersect(&mut self, other: &Self) {
        self.links &= &other.links;
    }

    /// Removes every link present in `other`.
    pub fn subtract(&mut self, other: &Self) {
        let inverted = !other.links.clone();
        self.links &= &inverted;
    }

    /// Iterates over the linked candidates.
    pub fn links(&self) -> impl Iterator<Item = CandidateIndex> + '_ {
        let size = self.size;
        self.links.iter_ones().map(move |i| CandidateIndex::new(i, size))
    }
}

impl std::fmt::Display for CandidateLinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CandidateLinks {{")?;
        for candidate in self.links() {
            write!(f, " {}", candidate)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_and_query() {
        let cu = CellUtility::new(9);
        let mut links = CandidateLinks::new(9);
        let a = cu.candidate_index(10);
        let b = cu.candidate_index(700);

        assert!(links.is_empty());
        assert!(links.set(a, true));
        assert!(!links.set(a, true));
        assert!(links.is_linked(a));
        assert!(!links.is_linked(b));
        assert_eq!(links.count(), 1);
        assert_eq!(links.links().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_boolean_ops() {
        let cu = CellUtility::new(9);
        let mut a = CandidateLinks::new(9);
        let mut b = CandidateLinks::new(9);
        a.set(cu.candidate_index(1), true);
        a.set(cu.candidate_index(2), true);
        b.set(cu.candidate_index(2), true);
        b.set(cu.candidate_index(3), true);

        let mut u = a.clone();
        u.union(&b);
        assert_eq!(u.count(), 3);

        let mut i = a.clone();
        i.intersect(&b);
        assert_eq!(i.links().collect::<Vec<_>>(), vec![cu.candidate_index(2)]);

        let mut s = a.clone();
        s.subtract(&b);
        assert_eq!(s.links().collect::<Vec<_>>(), vec![cu.candidate_index(1)]);
    }
}
