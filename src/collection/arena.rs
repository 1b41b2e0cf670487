//! Slot arena backing the AVL tree
//!
//! Nodes are addressed by `NodeId` instead of owning pointers so rotations can
//! rewire children without fighting the borrow checker. Freed slots are reused.

/// Index of a node inside an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live elements
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(element);
            id
        } else {
            self.slots.push(Some(element));
            NodeId(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.index()]
            .as_ref()
            .expect("`Arena::get()` - dangling node id")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.index()]
            .as_mut()
            .expect("`Arena::get_mut()` - dangling node id")
    }

    /// Remove an element, returning it and recycling its slot
    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let element = self.slots[id.index()]
            .take()
            .expect("`Arena::take()` - dangling node id");
        self.free.push(id);
        element
    }

    /// Drop every element at once
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
