//! FIFO of philosophers waiting for their chopsticks.
//!
//! Each `acquire_pair` call enqueues its philosopher once on entry and
//! removes it once on admission. Under the strict admission policy only
//! the head is ever admitted, which bounds how long anyone waits.

use std::collections::VecDeque;

/// Arrival-ordered queue of waiting philosopher ids.
#[derive(Debug, Clone, Default)]
pub struct FairnessQueue {
    waiting: VecDeque<usize>,
}

impl FairnessQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `actor` to the tail.
    pub fn enqueue(&mut self, actor: usize) {
        self.waiting.push_back(actor);
    }

    /// Returns the philosopher at the head, if any.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<usize> {
        self.waiting.front().copied()
    }

    /// Returns true if `actor` is at the head.
    #[inline]
    #[must_use]
    pub fn is_head(&self, actor: usize) -> bool {
        self.head() == Some(actor)
    }

    /// Removes the first entry for `actor`.
    ///
    /// Returns false if `actor` was not queued.
    pub fn remove(&mut self, actor: usize) -> bool {
        match self.waiting.iter().position(|&id| id == actor) {
            Some(index) => {
                self.waiting.remove(index);
                true
            }
            None => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Returns the queued ids, head first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<usize> {
        self.waiting.iter().copied().collect()
    }
}
