//! AVL-balanced binary search tree
//!
//! The tree maps unique, totally ordered keys to values. Nodes live in an
//! [`Arena`] and refer to their children by [`NodeId`]; a node is owned by
//! exactly one parent slot (or the root) and there are no back references.
//!
//! Invariants after every completed `insert`/`remove`:
//!
//! - keys in a node's left subtree compare less than the node's key, keys in
//!   its right subtree compare greater;
//! - every node's balance (`height(right) - height(left)`) is in `-1..=1`;
//! - no two nodes hold equal keys.
//!
//! Heights are cached on the nodes and refreshed bottom-up on the way back out
//! of every recursive insert/remove, so each rebalance step is O(1).

use std::cmp::Ordering;
use std::fmt;

use super::arena::{Arena, NodeId};
use super::error::{CollectionError, CollectionResult};

struct Node<K, E> {
    key: K,
    value: E,
    height: u32,
    balance: i32,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K, E> Node<K, E> {
    fn leaf(key: K, value: E) -> Self {
        Self {
            key,
            value,
            height: 1,
            balance: 0,
            left: None,
            right: None,
        }
    }
}

/// An ordered map implemented as a self-balancing (AVL) binary search tree
pub struct AvlTree<K, E> {
    arena: Arena<Node<K, E>>,
    root: Option<NodeId>,
}

impl<K: Ord, E> AvlTree<K, E> {
    /// Create an empty tree
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Check if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Discard every entry
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Look up the value stored under `key`
    pub fn search(&self, key: &K) -> CollectionResult<&E, E> {
        self.find(key)
            .map(|id| &self.arena.get(id).value)
            .ok_or(CollectionError::NotFound)
    }

    /// Look up the value stored under `key` for in-place modification
    ///
    /// The key itself cannot be reached through this reference.
    pub fn search_mut(&mut self, key: &K) -> CollectionResult<&mut E, E> {
        match self.find(key) {
            Some(id) => Ok(&mut self.arena.get_mut(id).value),
            None => Err(CollectionError::NotFound),
        }
    }

    /// Insert `value` under `key`
    ///
    /// If the key is already present nothing changes and the error carries a
    /// copy of the value that is currently stored there.
    pub fn insert(&mut self, key: K, value: E) -> CollectionResult<(), E>
    where
        E: Clone,
    {
        match self.insert_at(self.root, key, value) {
            Ok(root) => {
                self.root = Some(root);
                Ok(())
            }
            Err(occupant) => Err(CollectionError::KeyConflict {
                existing: self.arena.get(occupant).value.clone(),
            }),
        }
    }

    /// Remove the entry stored under `key`, returning its value
    pub fn remove(&mut self, key: &K) -> CollectionResult<E, E> {
        match self.remove_at(self.root, key) {
            Some((root, value)) => {
                self.root = root;
                Ok(value)
            }
            None => Err(CollectionError::NotFound),
        }
    }

    /// Visit every entry in ascending key order
    ///
    /// The visitor only gets shared access, so the tree cannot be changed
    /// while it is being walked. Collect first, mutate afterwards.
    pub fn for_each_in_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &E),
    {
        self.walk(self.root, false, &mut visitor);
    }

    /// Visit every entry in descending key order
    pub fn for_each_in_reverse_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &E),
    {
        self.walk(self.root, true, &mut visitor);
    }

    /// Iterate over entries in ascending key order
    pub fn iter(&self) -> Iter<'_, K, E> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.descend_left(self.root);
        iter
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.arena.get(id);
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    fn walk<F>(&self, node: Option<NodeId>, reverse: bool, visitor: &mut F)
    where
        F: FnMut(&K, &E),
    {
        let Some(id) = node else {
            return;
        };
        let node = self.arena.get(id);
        let (first, second) = if reverse {
            (node.right, node.left)
        } else {
            (node.left, node.right)
        };
        self.walk(first, reverse, visitor);
        visitor(&node.key, &node.value);
        self.walk(second, reverse, visitor);
    }

    // Returns the new subtree root, or the id of the node already holding `key`.
    fn insert_at(&mut self, node: Option<NodeId>, key: K, value: E) -> Result<NodeId, NodeId> {
        let Some(id) = node else {
            return Ok(self.arena.alloc(Node::leaf(key, value)));
        };

        match key.cmp(&self.arena.get(id).key) {
            Ordering::Less => {
                let left = self.arena.get(id).left;
                let child = self.insert_at(left, key, value)?;
                self.arena.get_mut(id).left = Some(child);
            }
            Ordering::Greater => {
                let right = self.arena.get(id).right;
                let child = self.insert_at(right, key, value)?;
                self.arena.get_mut(id).right = Some(child);
            }
            Ordering::Equal => return Err(id),
        }

        Ok(self.rebalance(id))
    }

    // Returns the new subtree root and the removed value, or None if absent.
    fn remove_at(&mut self, node: Option<NodeId>, key: &K) -> Option<(Option<NodeId>, E)> {
        let id = node?;

        match key.cmp(&self.arena.get(id).key) {
            Ordering::Less => {
                let left = self.arena.get(id).left;
                let (child, value) = self.remove_at(left, key)?;
                self.arena.get_mut(id).left = child;
                Some((Some(self.rebalance(id)), value))
            }
            Ordering::Greater => {
                let right = self.arena.get(id).right;
                let (child, value) = self.remove_at(right, key)?;
                self.arena.get_mut(id).right = child;
                Some((Some(self.rebalance(id)), value))
            }
            Ordering::Equal => {
                let (left, right) = {
                    let node = self.arena.get(id);
                    (node.left, node.right)
                };
                match (left, right) {
                    (Some(left), Some(_)) => {
                        // Two children: the in-order predecessor takes this slot.
                        let (new_left, key, value) = self.remove_max(left);
                        let node = self.arena.get_mut(id);
                        node.left = new_left;
                        node.key = key;
                        let removed = std::mem::replace(&mut node.value, value);
                        Some((Some(self.rebalance(id)), removed))
                    }
                    (child, None) | (None, child) => {
                        let node = self.arena.take(id);
                        Some((child, node.value))
                    }
                }
            }
        }
    }

    // Detach the right-most node of the subtree rooted at `id`.
    fn remove_max(&mut self, id: NodeId) -> (Option<NodeId>, K, E) {
        match self.arena.get(id).right {
            Some(right) => {
                let (child, key, value) = self.remove_max(right);
                self.arena.get_mut(id).right = child;
                (Some(self.rebalance(id)), key, value)
            }
            None => {
                let node = self.arena.take(id);
                (node.left, node.key, node.value)
            }
        }
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.arena.get(id).height)
    }

    fn update(&mut self, id: NodeId) {
        let (left, right) = {
            let node = self.arena.get(id);
            (self.height_of(node.left), self.height_of(node.right))
        };
        let node = self.arena.get_mut(id);
        node.height = 1 + left.max(right);
        node.balance = right as i32 - left as i32;
    }

    fn balance_of(&self, node: Option<NodeId>) -> i32 {
        node.map_or(0, |id| self.arena.get(id).balance)
    }

    // Refresh `id` and rotate if it leans by two. Returns the subtree root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update(id);
        let node = self.arena.get(id);
        let balance = node.balance;

        if balance <= -2 {
            let left = node.left;
            // A level child (only reachable through removal) takes the single
            // rotation; the double one would leave the result leaning by two.
            if balance * self.balance_of(left) >= 0 {
                self.rotate_right(id)
            } else {
                if let Some(left) = left {
                    let pivot = self.rotate_left(left);
                    self.arena.get_mut(id).left = Some(pivot);
                }
                self.rotate_right(id)
            }
        } else if balance >= 2 {
            let right = node.right;
            if balance * self.balance_of(right) >= 0 {
                self.rotate_left(id)
            } else {
                if let Some(right) = right {
                    let pivot = self.rotate_right(right);
                    self.arena.get_mut(id).right = Some(pivot);
                }
                self.rotate_left(id)
            }
        } else {
            id
        }
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.arena.get(id).left else {
            return id;
        };
        let inner = self.arena.get(pivot).right;
        self.arena.get_mut(id).left = inner;
        self.arena.get_mut(pivot).right = Some(id);
        self.update(id);
        self.update(pivot);
        pivot
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.arena.get(id).right else {
            return id;
        };
        let inner = self.arena.get(pivot).left;
        self.arena.get_mut(id).right = inner;
        self.arena.get_mut(pivot).left = Some(id);
        self.update(id);
        self.update(pivot);
        pivot
    }

    /// Walk the whole tree and assert order, balance, height and size
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        fn check<K: Ord, E>(tree: &AvlTree<K, E>, node: Option<NodeId>, count: &mut usize) -> u32 {
            let Some(id) = node else {
                return 0;
            };
            *count += 1;
            let n = tree.arena.get(id);
            if let Some(left) = n.left {
                assert!(tree.arena.get(left).key < n.key, "left child out of order");
            }
            if let Some(right) = n.right {
                assert!(tree.arena.get(right).key > n.key, "right child out of order");
            }
            let lh = check(tree, n.left, count);
            let rh = check(tree, n.right, count);
            let balance = rh as i32 - lh as i32;
            assert!((-1..=1).contains(&balance), "node out of balance: {}", balance);
            assert_eq!(n.balance, balance, "stale balance");
            assert_eq!(n.height, 1 + lh.max(rh), "stale height");
            n.height
        }

        let mut count = 0;
        check(self, self.root, &mut count);
        assert_eq!(count, self.len(), "size out of sync");

        let keys: Vec<&K> = self.iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "in-order walk not increasing");
    }
}

impl<K: Ord, E> Default for AvlTree<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, E: fmt::Debug> fmt::Debug for AvlTree<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over an [`AvlTree`]
pub struct Iter<'a, K, E> {
    tree: &'a AvlTree<K, E>,
    stack: Vec<NodeId>,
}

impl<K, E> Iter<'_, K, E> {
    fn descend_left(&mut self, mut node: Option<NodeId>) {
        while let Some(id) = node {
            self.stack.push(id);
            node = self.tree.arena.get(id).left;
        }
    }
}

impl<'a, K, E> Iterator for Iter<'a, K, E> {
    type Item = (&'a K, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.arena.get(id);
        self.descend_left(node.right);
        Some((&node.key, &node.value))
    }
}

impl<'a, K: Ord, E> IntoIterator for &'a AvlTree<K, E> {
    type Item = (&'a K, &'a E);
    type IntoIter = Iter<'a, K, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random sequence for shuffling test inputs
    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *seed >> 33
    }

    fn shuffled(n: u64, seed: u64) -> Vec<u64> {
        let mut seed = seed;
        let mut values: Vec<u64> = (0..n).collect();
        for i in (1..values.len()).rev() {
            let j = (lcg(&mut seed) % (i as u64 + 1)) as usize;
            values.swap(i, j);
        }
        values
    }

    fn one_two_three() -> AvlTree<i32, &'static str> {
        let mut tree = AvlTree::new();
        tree.insert(1, "one").unwrap();
        tree.insert(2, "two").unwrap();
        tree.insert(3, "three").unwrap();
        tree
    }

    #[test]
    fn test_insert_and_search() {
        let tree = one_two_three();
        assert_eq!(tree.search(&2), Ok(&"two"));
        assert_eq!(tree.len(), 3);
        tree.check_invariants();
    }

    #[test]
    fn test_duplicate_insert_reports_stored_value() {
        let mut tree = one_two_three();

        let err = tree.insert(3, "three-dup").unwrap_err();
        assert_eq!(err, CollectionError::KeyConflict { existing: "three" });
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.search(&3), Ok(&"three"));
        tree.check_invariants();
    }

    #[test]
    fn test_reverse_traversal() {
        let mut tree = AvlTree::new();
        for (key, value) in ["A", "B", "C", "D", "E"].into_iter().enumerate() {
            tree.insert(key, value).unwrap();
        }

        let mut visited = Vec::new();
        tree.for_each_in_reverse_order(|_, v| visited.push(*v));
        assert_eq!(visited, vec!["E", "D", "C", "B", "A"]);
    }

    #[test]
    fn test_remove_leaves_middle() {
        let mut tree = one_two_three();

        assert_eq!(tree.remove(&1), Ok("one"));
        assert_eq!(tree.remove(&3), Ok("three"));

        assert!(!tree.contains(&1));
        assert!(tree.contains(&2));
        assert!(!tree.contains(&3));
        assert_eq!(tree.len(), 1);
        tree.check_invariants();
    }

    #[test]
    fn test_empty_tree_not_found() {
        let mut tree: AvlTree<i32, &str> = AvlTree::new();
        assert_eq!(tree.search(&1), Err(CollectionError::NotFound));
        assert_eq!(tree.remove(&1), Err(CollectionError::NotFound));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_missing_key_leaves_tree_intact() {
        let mut tree = one_two_three();
        assert!(tree.remove(&42).unwrap_err().is_not_found());
        assert_eq!(tree.len(), 3);
        tree.check_invariants();
    }

    #[test]
    fn test_remove_node_with_two_children() {
        let mut tree = AvlTree::new();
        for key in [50, 30, 70, 20, 40, 60, 80, 35] {
            tree.insert(key, key * 10).unwrap();
        }

        // 30 has both children; its predecessor 20 moves up.
        assert_eq!(tree.remove(&30), Ok(300));
        tree.check_invariants();

        // Root removal.
        assert_eq!(tree.remove(&50), Ok(500));
        tree.check_invariants();

        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![20, 35, 40, 60, 70, 80]);
        assert_eq!(tree.search(&35), Ok(&350));
    }

    #[test]
    fn test_removal_beside_level_child_rotates_once() {
        let mut tree = AvlTree::new();
        for key in [5, 3, 8, 2, 7, 10, 6, 9] {
            tree.insert(key, ()).unwrap();
        }
        tree.check_invariants();

        // Root leans right by two and its right child 8 is level.
        assert_eq!(tree.remove(&2), Ok(()));
        tree.check_invariants();

        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 5, 6, 7, 8, 9, 10]);
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut tree = AvlTree::new();
        for key in 0..1024 {
            tree.insert(key, ()).unwrap();
        }
        tree.check_invariants();
        assert_eq!(tree.height(), 11);
    }

    #[test]
    fn test_in_order_matches_sorted_input() {
        let values = shuffled(500, 7);
        let mut tree = AvlTree::new();
        for v in &values {
            tree.insert(*v, v.to_string()).unwrap();
        }

        let mut forward = Vec::new();
        tree.for_each_in_order(|k, _| forward.push(*k));
        let mut expected = values.clone();
        expected.sort_unstable();
        assert_eq!(forward, expected);

        let mut backward = Vec::new();
        tree.for_each_in_reverse_order(|k, _| backward.push(*k));
        expected.reverse();
        assert_eq!(backward, expected);
    }

    #[test]
    fn test_balance_holds_through_mixed_operations() {
        let mut tree = AvlTree::new();
        let mut seed = 99;
        let mut inserted = 0usize;
        let mut removed = 0usize;

        for _ in 0..4000 {
            let key = lcg(&mut seed) % 300;
            if lcg(&mut seed) % 3 == 0 {
                if tree.remove(&key).is_ok() {
                    removed += 1;
                }
            } else if tree.insert(key, key).is_ok() {
                inserted += 1;
            }
            assert_eq!(tree.len(), inserted - removed);
        }
        tree.check_invariants();

        for key in shuffled(300, 3) {
            let _ = tree.remove(&key);
            tree.check_invariants();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_search_mut_updates_value() {
        let mut tree = one_two_three();
        *tree.search_mut(&2).unwrap() = "deux";
        assert_eq!(tree.search(&2), Ok(&"deux"));
    }

    #[test]
    fn test_clear() {
        let mut tree = one_two_three();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);

        tree.insert(9, "nine").unwrap();
        assert_eq!(tree.len(), 1);
        tree.check_invariants();
    }

    #[test]
    fn test_debug_output() {
        let tree = one_two_three();
        assert_eq!(format!("{:?}", tree), r#"{1: "one", 2: "two", 3: "three"}"#);
    }
}
