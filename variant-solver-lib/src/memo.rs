//! Contains [`MemoStore`], the board-lifetime cache for combinatorial
//! results.
//!
//! Keys are pure functions of the inputs they describe (cells, current
//! masks, parameters), so a cached answer stays valid for every board that
//! shares the store. Cloned boards therefore share one store.

use crate::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// A cached result. The variants cover the payloads the sum engine and the
/// DP-style constraints produce; the key's purpose prefix decides which
/// variant a reader expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValue {
    /// Per-cell keep masks.
    Masks(Vec<ValueMask>),
    /// An inclusive (min, max) range.
    MinMax(usize, usize),
    /// A sorted list of attainable sums.
    Sums(Vec<usize>),
    /// A single yes/no answer.
    Flag(bool),
}

/// An append-only map from structured string keys to cached payloads.
///
/// Keys follow the convention `purpose|cells|mask-signature|params` so that
/// different purposes can never collide.
#[derive(Debug, Default)]
pub struct MemoStore {
    map: HashMap<String, Arc<MemoValue>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached value.
    pub fn get(&self, key: &str) -> Option<Arc<MemoValue>> {
        self.map.get(key).cloned()
    }

    /// Stores a value, returning the shared handle.
    pub fn store(&mut self, key: String, value: MemoValue) -> Arc<MemoValue> {
        let value = Arc::new(value);
        self.map.insert(key, value.clone());
        value
    }

    /// The number of cached entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builds the mask-signature portion of a memo key: the current candidate
/// bits of each cell, in order, in hex.
pub fn mask_signature(board: &Board, cells: &[CellIndex]) -> String {
    use std::fmt::Write;
    let mut sig = String::with_capacity(cells.len() * 4);
    for &cell in cells {
        let bits: u32 = board.cell(cell).without_given().into();
        let _ = write!(sig, "{:x},", bits);
    }
    sig
}

/// Builds the cell-list portion of a memo key.
pub fn cells_signature(cells: &[CellIndex]) -> String {
    use std::fmt::Write;
    let mut sig = String::with_capacity(cells.len() * 3);
    for &cell in cells {
        let _ = write!(sig, "{},", cell.index());
    }
    sig
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoStore::new();
        assert!(store.get("minmax|1,2,3|").is_none());
        store.store("minmax|1,2,3|".to_string(), MemoValue::MinMax(6, 24));
        assert_eq!(store.len(), 1);
        let value = store.get("minmax|1,2,3|").unwrap();
        assert_eq!(*value, MemoValue::MinMax(6, 24));
    }

    #[test]
    fn test_signatures() {
        let board = Board::new(9);
        let cu = CellUtility::new(9);
        let cells = vec![cu.cell(0, 0), cu.cell(0, 1)];
        assert_eq!(cells_signature(&cells), "0,1,");
        assert_eq!(mask_signature(&board, &cells), "1ff,1ff,");
    }
}
