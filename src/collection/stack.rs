//! Singly linked LIFO buffer
//!
//! Used to snapshot records before a cascading update so the collection being
//! updated is never mutated while it is walked.

struct Frame<T> {
    value: T,
    below: Option<Box<Frame<T>>>,
}

/// A singly linked stack
pub struct SimpleStack<T> {
    top: Option<Box<Frame<T>>>,
    len: usize,
}

impl<T> SimpleStack<T> {
    pub const fn new() -> Self {
        Self { top: None, len: 0 }
    }

    /// Push a value on top, O(1)
    pub fn push(&mut self, value: T) {
        let below = self.top.take();
        self.top = Some(Box::new(Frame { value, below }));
        self.len += 1;
    }

    /// Pop the top value, O(1). `None` means the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.top.take().map(|frame| {
            let frame = *frame;
            self.top = frame.below;
            self.len -= 1;
            frame.value
        })
    }

    /// Peek at the top value without removing it
    pub fn peek(&self) -> Option<&T> {
        self.top.as_ref().map(|frame| &frame.value)
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<T> Default for SimpleStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink iteratively; the default recursive drop can overflow on long stacks.
impl<T> Drop for SimpleStack<T> {
    fn drop(&mut self) {
        let mut current = self.top.take();
        while let Some(mut frame) = current {
            current = frame.below.take();
        }
    }
}

impl<T> Extend<T> for SimpleStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for SimpleStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}
