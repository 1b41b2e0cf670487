//! Ordered keyed collection
//!
//! Wraps an [`AvlTree`] so that every value is stored under its own
//! [`Keyed::key`]. Because the key is derived from the value, a value whose key
//! fields change must leave the tree and come back: [`redefine_key`] is the
//! only way to do that, and it either fully succeeds or changes nothing.
//!
//! [`redefine_key`]: OrderedCollection::redefine_key

use std::fmt;

use super::error::{CollectionError, CollectionResult};
use super::keyed::Keyed;
use super::tree::AvlTree;

/// A set of [`Keyed`] values ordered by their keys
pub struct OrderedCollection<E: Keyed> {
    tree: AvlTree<E::Key, E>,
}

impl<E: Keyed> OrderedCollection<E> {
    /// Create an empty collection
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn contains(&self, key: &E::Key) -> bool {
        self.tree.contains(key)
    }

    /// Look up a value by key
    pub fn search(&self, key: &E::Key) -> CollectionResult<&E, E> {
        self.tree.search(key)
    }

    /// Remove and return the value stored under `key`
    pub fn remove(&mut self, key: &E::Key) -> CollectionResult<E, E> {
        self.tree.remove(key)
    }

    /// Visit every value in key order (descending when `reverse` is set)
    pub fn for_each<F>(&self, reverse: bool, mut visitor: F)
    where
        F: FnMut(&E),
    {
        if reverse {
            self.tree.for_each_in_reverse_order(|_, value| visitor(value));
        } else {
            self.tree.for_each_in_order(|_, value| visitor(value));
        }
    }

    /// Iterate over values in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.tree.iter().map(|(_, value)| value)
    }

    /// Mutable access for fields that are not part of the key
    ///
    /// Callers must not change anything `Keyed::key` depends on.
    pub(crate) fn search_mut(&mut self, key: &E::Key) -> CollectionResult<&mut E, E> {
        self.tree.search_mut(key)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.tree.check_invariants();
        for (key, value) in self.tree.iter() {
            assert!(*key == value.key(), "stored key differs from value key");
        }
    }
}

impl<E: Keyed + Clone> OrderedCollection<E> {
    /// Insert a value under its own key
    pub fn insert(&mut self, value: E) -> CollectionResult<(), E> {
        value.check_key()?;
        self.tree.insert(value.key(), value)
    }

    /// Change the key fields of the value stored under `current`
    ///
    /// The new key is previewed first. If a different value already holds it
    /// the call fails with `KeyConflict` carrying that value, and nothing is
    /// modified. Otherwise the value is removed, changed, and reinserted under
    /// its new key, which is returned.
    pub fn redefine_key(&mut self, current: &E::Key, change: E::Change) -> CollectionResult<E::Key, E> {
        let element = self.tree.search(current)?;
        let candidate = element.preview_key(&change)?;

        if candidate != *current {
            if let Ok(existing) = self.tree.search(&candidate) {
                return Err(CollectionError::KeyConflict {
                    existing: existing.clone(),
                });
            }
        }

        let original = self.tree.remove(current)?;
        let mut element = original.clone();
        if let Err(err) = element.set_key(change) {
            self.tree.insert(current.clone(), original)?;
            return Err(err.into());
        }

        // A `set_key` that strays from its preview can still collide; the
        // untouched original goes back where it was.
        let key = element.key();
        if let Err(err) = self.tree.insert(key.clone(), element) {
            self.tree.insert(current.clone(), original)?;
            return Err(err);
        }
        Ok(key)
    }
}

impl<E: Keyed> Default for OrderedCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Keyed + fmt::Debug> fmt::Debug for OrderedCollection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
