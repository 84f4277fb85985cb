//! Fixed-capacity stack that forgets its oldest entry on overflow.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::error::{DrawError, DrawResult};

#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    /// Oldest first
    entries: VecDeque<T>,
    capacity: NonZeroUsize,
}

#[allow(dead_code)]
impl<T> BoundedHistory<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// A history that never evicts (used for redo).
    pub fn unbounded() -> Self {
        Self::new(NonZeroUsize::MAX)
    }

    /// Push as newest, first dropping the oldest entries that would not fit.
    pub fn push(&mut self, item: T) {
        while self.entries.len() >= self.capacity.get() {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
    }

    pub fn pop(&mut self) -> DrawResult<T> {
        self.entries.pop_back().ok_or(DrawError::Underflow)
    }

    pub fn peek(&self) -> DrawResult<&T> {
        self.entries.back().ok_or(DrawError::Underflow)
    }

    /// Positional access, oldest at 0.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rebuild with a new capacity, keeping the most recent entries that fit.
    pub fn resized(self, capacity: NonZeroUsize) -> Self {
        let mut resized = Self::new(capacity);
        for entry in self.entries {
            resized.push(entry);
        }
        resized
    }
}
