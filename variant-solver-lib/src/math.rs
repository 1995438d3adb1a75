//! Provides commonly needed math helpers and weak-link pair generators.

use crate::prelude::*;
use itertools::Itertools;

/// Returns the binomial coefficient of `n` choose `k`.
///
/// # Example
/// ```
/// # use variant_solver_lib::math::binomial_coefficient;
/// assert_eq!(binomial_coefficient(5, 2), 10);
/// assert_eq!(binomial_coefficient(10, 5), 252);
/// assert_eq!(binomial_coefficient(4, 5), 0);
/// ```
pub fn binomial_coefficient(n: usize, k: usize) -> usize {
    if k > n {
        0
    } else if k == 0 || k == n {
        1
    } else if k == 1 || k == n - 1 {
        n
    } else if k + k < n {
        (binomial_coefficient(n - 1, k - 1) * n) / k
    } else {
        (binomial_coefficient(n - 1, k) * n) / (n - k)
    }
}

/// Returns the default box assignment for a board of the given size:
/// a flat list of which box index each cell belongs to.
///
/// # Example
/// ```
/// # use variant_solver_lib::math::default_boxes;
/// let boxes = default_boxes(6);
/// assert_eq!(boxes.len(), 36);
/// assert_eq!(boxes[0], 0);
/// assert_eq!(boxes[5], 1);
/// assert_eq!(boxes[12], 2);
/// ```
pub fn default_boxes(size: usize) -> Vec<usize> {
    if size == 0 {
        return Vec::new();
    }

    let mut box_height = (size as f64).sqrt().floor() as usize;
    while size % box_height != 0 {
        box_height -= 1;
    }
    let box_width = size / box_height;

    let mut boxes = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            boxes.push((i / box_height) * box_height + (j / box_width));
        }
    }
    boxes
}

/// Weak links encoding that the same digit cannot repeat within the group.
pub fn nonrepeat_pairs(
    cells: impl Iterator<Item = CellIndex> + Clone,
    size: usize,
) -> Vec<(CandidateIndex, CandidateIndex)> {
    cells
        .tuple_combinations()
        .flat_map(move |(cell1, cell2)| {
            (1..=size).map(move |value| (cell1.candidate(value), cell2.candidate(value)))
        })
        .collect()
}

/// Weak links encoding `b >= a + min_diff`: every pair `(a = va, b = vb)`
/// with `vb < va + min_diff` is excluded.
///
/// # Example
/// ```
/// # use variant_solver_lib::prelude::*;
/// let cu = CellUtility::new(9);
/// let pairs = lt_pairs(cu.cell(0, 0), cu.cell(0, 1), 1, 9);
/// // 1 in the first cell forbids only 1 in the second
/// assert!(pairs.contains(&(cu.cell(0, 0).candidate(1), cu.cell(0, 1).candidate(1))));
/// assert!(!pairs.contains(&(cu.cell(0, 0).candidate(1), cu.cell(0, 1).candidate(2))));
/// // 9 in the first cell forbids everything in the second
/// assert!(pairs.contains(&(cu.cell(0, 0).candidate(9), cu.cell(0, 1).candidate(9))));
/// ```
pub fn lt_pairs(
    a: CellIndex,
    b: CellIndex,
    min_diff: usize,
    size: usize,
) -> Vec<(CandidateIndex, CandidateIndex)> {
    let mut result = Vec::new();
    for va in 1..=size {
        for vb in 1..=size {
            if vb < va + min_diff {
                result.push((a.candidate(va), b.candidate(vb)));
            }
        }
    }
    result
}

/// Weak links forcing both cells to hold the same value: every pair of
/// differing values is excluded.
pub fn eq_pairs(a: CellIndex, b: CellIndex, size: usize) -> Vec<(CandidateIndex, CandidateIndex)> {
    let mut result = Vec::new();
    for va in 1..=size {
        for vb in 1..=size {
            if va != vb {
                result.push((a.candidate(va), b.candidate(vb)));
            }
        }
    }
    result
}

/// Weak links forcing the two cells to differ: every equal-value pair is
/// excluded.
pub fn neq_pairs(a: CellIndex, b: CellIndex, size: usize) -> Vec<(CandidateIndex, CandidateIndex)> {
    (1..=size).map(|v| (a.candidate(v), b.candidate(v))).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_boxes_9() {
        let boxes = default_boxes(9);
        assert_eq!(boxes.len(), 81);
        // r1c1..r1c3 in box 0, r1c4..r1c6 in box 1
        assert_eq!(&boxes[0..9], &[0, 0, 0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(boxes[80], 8);
    }

    #[test]
    fn test_pair_counts() {
        let cu = CellUtility::new(9);
        let a = cu.cell(0, 0);
        let b = cu.cell(0, 1);
        assert_eq!(neq_pairs(a, b, 9).len(), 9);
        assert_eq!(eq_pairs(a, b, 9).len(), 72);
        // b >= a + 1: pairs (va, vb) with vb <= va: 1+2+..+9 = 45
        assert_eq!(lt_pairs(a, b, 1, 9).len(), 45);
        let cells = vec![a, b, cu.cell(0, 2)];
        assert_eq!(nonrepeat_pairs(cells.into_iter(), 9).len(), 27);
    }
}
