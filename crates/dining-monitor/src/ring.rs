//! # Chopstick Ring
//!
//! Busy flags for the chopsticks laid out around the table.
//!
//! Slot `i` sits between philosopher `i` and philosopher `i - 1`, so
//! philosopher `a` needs slots `a mod N` and `(a - 1) mod N`. The
//! subtraction is taken euclidean-style: philosopher 0 reaches around the
//! table to slot `N - 1`.
//!
//! A lone philosopher still gets two distinct chopsticks: the ring holds
//! two slots and the pair is always `(0, 1)`.
//!
//! ## Instrumentation
//!
//! Every flag transition is checked. Taking a held chopstick or dropping
//! a free one is counted as a violation and logged, but the flag is still
//! written: the ring records what callers did, it does not police them.

use tracing::warn;

/// Slots used by `actor` at a table of `philosophers` seats.
pub(crate) fn pair_indices(philosophers: usize, actor: usize) -> (usize, usize) {
    if philosophers == 1 {
        return (0, 1);
    }
    let left = actor % philosophers;
    (left, (left + philosophers - 1) % philosophers)
}

/// Busy flags for every chopstick on the table.
///
/// # Example
///
/// ```rust
/// use dining_monitor::ChopstickRing;
///
/// let mut ring = ChopstickRing::new(5);
/// assert_eq!(ring.pair_for(0), (0, 4));
///
/// ring.take_pair(0);
/// assert!(ring.is_held(4));
/// assert!(ring.any_held(1)); // philosopher 1 shares slot 0
/// ```
#[derive(Debug, Clone)]
pub struct ChopstickRing {
    held: Vec<bool>,
    philosophers: usize,
    violations: u64,
}

impl ChopstickRing {
    /// Creates a ring for `philosophers` seats with every chopstick free.
    ///
    /// `philosophers` must be at least 1; [`crate::Monitor`] validates this
    /// before building a ring.
    #[must_use]
    pub fn new(philosophers: usize) -> Self {
        let slots = if philosophers == 1 { 2 } else { philosophers };
        Self {
            held: vec![false; slots],
            philosophers,
            violations: 0,
        }
    }

    /// Returns the two slots philosopher `actor` eats with.
    ///
    /// Ids beyond the table size wrap around.
    #[inline]
    #[must_use]
    pub fn pair_for(&self, actor: usize) -> (usize, usize) {
        pair_indices(self.philosophers, actor)
    }

    /// Returns true if `slot` is currently held.
    #[inline]
    #[must_use]
    pub fn is_held(&self, slot: usize) -> bool {
        self.held[slot]
    }

    /// Returns true if at least one of `actor`'s chopsticks is held.
    #[must_use]
    pub fn any_held(&self, actor: usize) -> bool {
        let (left, right) = self.pair_for(actor);
        self.held[left] || self.held[right]
    }

    /// Returns true if both of `actor`'s chopsticks are held.
    #[must_use]
    pub fn both_held(&self, actor: usize) -> bool {
        let (left, right) = self.pair_for(actor);
        self.held[left] && self.held[right]
    }

    /// Marks both of `actor`'s chopsticks as held.
    pub fn take_pair(&mut self, actor: usize) {
        let (left, right) = self.pair_for(actor);
        self.set(left, true, actor);
        self.set(right, true, actor);
    }

    /// Marks both of `actor`'s chopsticks as free.
    pub fn drop_pair(&mut self, actor: usize) {
        let (left, right) = self.pair_for(actor);
        self.set(left, false, actor);
        self.set(right, false, actor);
    }

    fn set(&mut self, slot: usize, held: bool, actor: usize) {
        if self.held[slot] == held {
            self.violations += 1;
            warn!(
                philosopher = actor,
                chopstick = slot,
                held,
                "chopstick flag written without a transition"
            );
        }
        self.held[slot] = held;
    }

    /// Returns the indices of every held chopstick, ascending.
    #[must_use]
    pub fn held_slots(&self) -> Vec<usize> {
        self.held
            .iter()
            .enumerate()
            .filter_map(|(slot, &held)| held.then_some(slot))
            .collect()
    }

    /// Returns the number of chopstick slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Returns true if the ring has no slots. Never true for a built ring.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Returns how many flag writes were not real transitions.
    #[inline]
    #[must_use]
    pub const fn violations(&self) -> u64 {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_wrap_around_the_table() {
        let ring = ChopstickRing::new(4);
        assert_eq!(ring.pair_for(0), (0, 3));
        assert_eq!(ring.pair_for(1), (1, 0));
        assert_eq!(ring.pair_for(3), (3, 2));
        // ids past the table size reduce modulo N
        assert_eq!(ring.pair_for(5), (1, 0));
    }

    #[test]
    fn test_lone_philosopher_gets_two_slots() {
        let ring = ChopstickRing::new(1);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.pair_for(0), (0, 1));
        assert_eq!(ring.pair_for(7), (0, 1));
    }

    #[test]
    fn test_take_and_drop() {
        let mut ring = ChopstickRing::new(3);
        ring.take_pair(1);
        assert_eq!(ring.held_slots(), vec![0, 1]);
        assert!(ring.both_held(1));
        assert!(ring.any_held(2));
        assert!(!ring.both_held(2));

        ring.drop_pair(1);
        assert!(ring.held_slots().is_empty());
        assert_eq!(ring.violations(), 0);
    }

    #[test]
    fn test_double_take_counts_violation() {
        let mut ring = ChopstickRing::new(3);
        ring.take_pair(0); // slots 0, 2
        ring.take_pair(1); // slots 1, 0
        assert_eq!(ring.violations(), 1);
        assert_eq!(ring.held_slots(), vec![0, 1, 2]);
    }

    #[test]
    fn test_drop_of_free_chopsticks_counts_violation() {
        let mut ring = ChopstickRing::new(2);
        ring.drop_pair(0);
        assert_eq!(ring.violations(), 2);
        assert!(ring.held_slots().is_empty());
    }

    #[test]
    fn test_two_philosophers_share_both_chopsticks() {
        let ring = ChopstickRing::new(2);
        assert_eq!(ring.pair_for(0), (0, 1));
        assert_eq!(ring.pair_for(1), (1, 0));
    }
}
