//! Backtrackable per-constraint state storage.
//!
//! Constraints that track per-solve progress (a cardinality count, the
//! surviving subboards of a disjunction) keep that progress in the board's
//! state arena rather than in the constraint object itself. Cloning a board
//! for search clones each slot value-wise, so backtracking costs the size
//! of the state, and the immutable constraint objects can stay shared.

use std::any::Any;
use std::marker::PhantomData;

/// Object-safe clone-plus-downcast wrapper for arena slots.
pub trait StateValue: Any {
    fn clone_box(&self) -> Box<dyn StateValue>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone> StateValue for T {
    fn clone_box(&self) -> Box<dyn StateValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An opaque typed handle to one arena slot.
///
/// The type parameter is carried statically, so lookups need no runtime
/// tag; handing a key to an arena that holds a different type at that slot
/// is a contract violation and panics.
#[derive(Debug)]
pub struct StateKey<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    pub(crate) fn new(index: usize) -> Self {
        Self { index, _marker: PhantomData }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

/// The slots themselves. Owned by a board; cloned value-wise with it.
#[derive(Default)]
pub struct StateArena {
    slots: Vec<Box<dyn StateValue>>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot holding `value` and returns its typed key.
    pub fn register<T: Any + Clone>(&mut self, value: T) -> StateKey<T> {
        self.slots.push(Box::new(value));
        StateKey::new(self.slots.len() - 1)
    }

    /// Immutable access to a slot.
    pub fn get<T: Any + Clone>(&self, key: StateKey<T>) -> &T {
        self.slots[key.index()]
            .as_any()
            .downcast_ref::<T>()
            .expect("constraint state slot holds a different type")
    }

    /// Mutable access to a slot.
    pub fn get_mut<T: Any + Clone>(&mut self, key: StateKey<T>) -> &mut T {
        self.slots[key.index()]
            .as_any_mut()
            .downcast_mut::<T>()
            .expect("constraint state slot holds a different type")
    }

    /// The number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Clone for StateArena {
    fn clone(&self) -> Self {
        let mut slots: Vec<Box<dyn StateValue>> = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            slots.push(StateValue::clone_box(&**slot));
        }
        Self { slots }
    }
}

impl std::fmt::Debug for StateArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateArena({} slots)", self.slots.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_and_access() {
        let mut arena = StateArena::new();
        let key = arena.register(vec![1usize, 2, 3]);
        assert_eq!(arena.get(key), &vec![1, 2, 3]);
        arena.get_mut(key).push(4);
        assert_eq!(arena.get(key).len(), 4);
    }

    #[test]
    fn test_clone_is_value_wise() {
        let mut arena = StateArena::new();
        let key = arena.register(7usize);
        let mut cloned = arena.clone();
        *cloned.get_mut(key) = 9;
        assert_eq!(*arena.get(key), 7);
        assert_eq!(*cloned.get(key), 9);
    }

    #[test]
    #[should_panic(expected = "different type")]
    fn test_type_mismatch_panics() {
        let mut arena = StateArena::new();
        arena.register(7usize);
        let bad_key: StateKey<String> = StateKey::new(0);
        arena.get(bad_key);
    }
}
