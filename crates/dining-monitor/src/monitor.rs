//! # Dining Monitor
//!
//! One lock, one condition variable, two protocols:
//!
//! - **Chopstick pairs**: a philosopher is granted both of its chopsticks
//!   at once, in the order set by the fairness queue.
//! - **Speaking turn**: a single anonymous privilege, held by at most one
//!   philosopher at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Monitor                     │
//! │  Mutex<TableState> ─────────── Condvar turn  │
//! │  ┌──────────────┬──────────────┬──────────┐  │
//! │  │ ChopstickRing│ FairnessQueue│ speaking │  │
//! │  └──────────────┴──────────────┴──────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every wake is a broadcast. A woken philosopher re-checks its own
//! predicate under the lock before it proceeds, so spurious and stale
//! wakes are harmless.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use dining_monitor::Monitor;
//!
//! let monitor = Arc::new(Monitor::new(3)?);
//!
//! let handles: Vec<_> = (0..3)
//!     .map(|id| {
//!         let monitor = Arc::clone(&monitor);
//!         thread::spawn(move || -> dining_monitor::Result<()> {
//!             monitor.acquire_pair(id)?;
//!             monitor.release_pair(id)?;
//!             Ok(())
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().expect("philosopher panicked")?;
//! }
//! assert_eq!(monitor.status()?.grants, 3);
//! # Ok::<(), dining_monitor::MonitorError>(())
//! ```

use std::sync::{Condvar, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{MonitorError, Result};
use crate::queue::FairnessQueue;
use crate::ring::{pair_indices, ChopstickRing};

/// Rule deciding when a queued philosopher may take its chopsticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionPolicy {
    /// Admit only the head of the queue, and only once both of its
    /// chopsticks are free.
    #[default]
    Strict,

    /// Keep waiting only while both chopsticks are held and the
    /// philosopher is not at the head.
    ///
    /// This reproduces the historical predicate. It can hand out a
    /// chopstick that is already held: an arrival whose pair is half
    /// free, or a head whose pair is still busy, proceeds anyway. The
    /// ring counts each such double-hold as a violation.
    Legacy,
}

/// Configuration for [`Monitor`].
///
/// # Example
///
/// ```rust
/// use dining_monitor::{AdmissionPolicy, MonitorConfig};
///
/// let config = MonitorConfig::new(5).with_admission(AdmissionPolicy::Legacy);
/// assert_eq!(config.philosophers, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Number of philosophers seated at the table. Must be at least 1.
    pub philosophers: usize,
    /// Admission rule for `acquire_pair`.
    pub admission: AdmissionPolicy,
}

impl MonitorConfig {
    /// Creates a config for `philosophers` seats with strict admission.
    #[must_use]
    pub const fn new(philosophers: usize) -> Self {
        Self {
            philosophers,
            admission: AdmissionPolicy::Strict,
        }
    }

    /// Sets the admission policy.
    #[must_use]
    pub const fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }
}

/// Everything guarded by the monitor lock.
#[derive(Debug)]
struct TableState {
    ring: ChopstickRing,
    queue: FairnessQueue,
    speaking: bool,
    grants: u64,
    releases: u64,
    speeches: u64,
}

impl TableState {
    fn new(philosophers: usize) -> Self {
        Self {
            ring: ChopstickRing::new(philosophers),
            queue: FairnessQueue::new(),
            speaking: false,
            grants: 0,
            releases: 0,
            speeches: 0,
        }
    }

    fn must_wait(&self, actor: usize, admission: AdmissionPolicy) -> bool {
        let at_head = self.queue.is_head(actor);
        match admission {
            AdmissionPolicy::Strict => !at_head || self.ring.any_held(actor),
            AdmissionPolicy::Legacy => !at_head && self.ring.both_held(actor),
        }
    }
}

/// Synchronization controller for a table of dining philosophers.
///
/// # Thread Safety
///
/// `Monitor` is `Send + Sync`; share it between philosophers as
/// `Arc<Monitor>`. Every method is a critical section under one lock.
/// Only [`acquire_pair`](Self::acquire_pair) and
/// [`request_speak`](Self::request_speak) ever block.
///
/// # Caller Contract
///
/// The monitor trusts its callers. It does not check that a philosopher
/// releasing chopsticks actually holds them, that nobody acquires twice
/// without releasing, or that `end_speak` comes from the speaker. Such
/// misuse is applied as-is and shows up in [`MonitorStatus::violations`].
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    state: Mutex<TableState>,
    turn: Condvar,
}

impl Monitor {
    /// Creates a monitor for `philosophers` seats with strict admission.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidConfig`] if `philosophers` is zero.
    pub fn new(philosophers: usize) -> Result<Self> {
        Self::with_config(MonitorConfig::new(philosophers))
    }

    /// Creates a monitor from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidConfig`] if the table has no seats.
    pub fn with_config(config: MonitorConfig) -> Result<Self> {
        if config.philosophers == 0 {
            return Err(MonitorError::InvalidConfig(
                "a table needs at least one philosopher".to_string(),
            ));
        }

        Ok(Self {
            state: Mutex::new(TableState::new(config.philosophers)),
            turn: Condvar::new(),
            config,
        })
    }

    /// Returns the configuration this monitor was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Returns the chopstick slots philosopher `actor` eats with.
    #[must_use]
    pub fn pair_for(&self, actor: usize) -> (usize, usize) {
        pair_indices(self.config.philosophers, actor)
    }

    /// Blocks until `actor` holds both of its chopsticks.
    ///
    /// The philosopher joins the tail of the fairness queue, waits until the
    /// admission policy lets it through, then marks both chopsticks held and
    /// leaves the queue.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock was poisoned, either
    /// on entry or while this philosopher was suspended. The queue entry
    /// is left behind in that case.
    pub fn acquire_pair(&self, actor: usize) -> Result<()> {
        let mut state = self.lock("acquire_pair")?;
        state.queue.enqueue(actor);
        trace!(philosopher = actor, queued = state.queue.len(), "waiting for chopsticks");

        while state.must_wait(actor, self.config.admission) {
            state = self.wait(state, "acquire_pair")?;
        }

        state.ring.take_pair(actor);
        state.queue.remove(actor);
        state.grants += 1;
        debug!(philosopher = actor, "chopsticks granted");

        // The head changed; the next in line may already be admissible.
        if !state.queue.is_empty() {
            self.turn.notify_all();
        }
        Ok(())
    }

    /// Puts down both of `actor`'s chopsticks and wakes every waiter.
    ///
    /// Never blocks beyond taking the lock.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock was poisoned.
    pub fn release_pair(&self, actor: usize) -> Result<()> {
        let mut state = self.lock("release_pair")?;
        state.ring.drop_pair(actor);
        state.releases += 1;
        debug!(philosopher = actor, "chopsticks released");
        self.turn.notify_all();
        Ok(())
    }

    /// Blocks until nobody else is speaking, then takes the speaking turn.
    ///
    /// There is no queue behind this privilege: when several philosophers
    /// are waiting, whichever the scheduler wakes first wins.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock was poisoned.
    pub fn request_speak(&self) -> Result<()> {
        let mut state = self.lock("request_speak")?;
        while state.speaking {
            state = self.wait(state, "request_speak")?;
        }

        state.speaking = true;
        state.speeches += 1;
        trace!("speaking turn taken");
        self.turn.notify_all();
        Ok(())
    }

    /// Gives up the speaking turn and wakes every waiter.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock was poisoned.
    pub fn end_speak(&self) -> Result<()> {
        let mut state = self.lock("end_speak")?;
        state.speaking = false;
        trace!("speaking turn released");
        self.turn.notify_all();
        Ok(())
    }

    /// Returns a snapshot of the table.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock was poisoned.
    pub fn status(&self) -> Result<MonitorStatus> {
        let state = self.lock("status")?;
        Ok(MonitorStatus {
            philosophers: self.config.philosophers,
            chopsticks: state.ring.len(),
            held_chopsticks: state.ring.held_slots(),
            queue: state.queue.to_vec(),
            speaking: state.speaking,
            grants: state.grants,
            releases: state.releases,
            speeches: state.speeches,
            violations: state.ring.violations(),
        })
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, TableState>> {
        self.state.lock().map_err(|_| Self::poisoned(operation))
    }

    fn wait<'a>(
        &self,
        guard: MutexGuard<'a, TableState>,
        operation: &'static str,
    ) -> Result<MutexGuard<'a, TableState>> {
        self.turn.wait(guard).map_err(|_| Self::poisoned(operation))
    }

    fn poisoned(operation: &'static str) -> MonitorError {
        warn!(operation, "monitor lock poisoned");
        MonitorError::Poisoned { operation }
    }
}

/// Snapshot of the monitor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    /// Seats at the table.
    pub philosophers: usize,
    /// Chopstick slots (2 for a lone philosopher, otherwise one per seat).
    pub chopsticks: usize,
    /// Chopstick slots currently held, ascending.
    pub held_chopsticks: Vec<usize>,
    /// Philosophers waiting for chopsticks, head first.
    pub queue: Vec<usize>,
    /// Whether the speaking turn is taken.
    pub speaking: bool,
    /// Completed `acquire_pair` calls.
    pub grants: u64,
    /// Completed `release_pair` calls.
    pub releases: u64,
    /// Completed `request_speak` calls.
    pub speeches: u64,
    /// Chopstick flag writes that were not real transitions.
    pub violations: u64,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_config_builder() {
        let config = MonitorConfig::new(7).with_admission(AdmissionPolicy::Legacy);
        assert_eq!(config.philosophers, 7);
        assert_eq!(config.admission, AdmissionPolicy::Legacy);
        assert_eq!(MonitorConfig::new(2).admission, AdmissionPolicy::Strict);
    }

    #[test]
    fn test_zero_philosophers_rejected() {
        let err = Monitor::new(0).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn test_fresh_monitor_is_idle() {
        let monitor = Monitor::new(5).unwrap();
        let status = monitor.status().unwrap();

        assert_eq!(status.philosophers, 5);
        assert_eq!(status.chopsticks, 5);
        assert!(status.held_chopsticks.is_empty());
        assert!(status.queue.is_empty());
        assert!(!status.speaking);
        assert_eq!(status.grants, 0);
    }

    #[test]
    fn test_acquire_and_release_updates_flags() {
        let monitor = Monitor::new(4).unwrap();

        monitor.acquire_pair(2).unwrap();
        let status = monitor.status().unwrap();
        assert_eq!(status.held_chopsticks, vec![1, 2]);
        assert!(status.queue.is_empty());

        monitor.release_pair(2).unwrap();
        let status = monitor.status().unwrap();
        assert!(status.held_chopsticks.is_empty());
        assert_eq!(status.grants, 1);
        assert_eq!(status.releases, 1);
        assert_eq!(status.violations, 0);
    }

    #[test]
    fn test_non_neighbours_eat_together() {
        let monitor = Monitor::new(4).unwrap();
        monitor.acquire_pair(0).unwrap(); // 0, 3
        monitor.acquire_pair(2).unwrap(); // 2, 1

        let status = monitor.status().unwrap();
        assert_eq!(status.held_chopsticks, vec![0, 1, 2, 3]);
        assert_eq!(status.violations, 0);
    }

    #[test]
    fn test_speaking_flag_round_trip() {
        let monitor = Monitor::new(3).unwrap();
        monitor.request_speak().unwrap();
        assert!(monitor.status().unwrap().speaking);

        monitor.end_speak().unwrap();
        assert!(!monitor.status().unwrap().speaking);
        assert_eq!(monitor.status().unwrap().speeches, 1);
    }

    #[test]
    fn test_end_speak_without_turn_is_tolerated() {
        let monitor = Monitor::new(2).unwrap();
        monitor.end_speak().unwrap();
        assert!(!monitor.status().unwrap().speaking);
    }

    #[test]
    fn test_legacy_admits_half_free_pair() {
        let config = MonitorConfig::new(3).with_admission(AdmissionPolicy::Legacy);
        let monitor = Monitor::with_config(config).unwrap();

        monitor.acquire_pair(0).unwrap(); // 0, 2
        // Philosopher 1 is alone in the queue, so it is admitted even
        // though slot 0 is taken.
        monitor.acquire_pair(1).unwrap();

        let status = monitor.status().unwrap();
        assert_eq!(status.violations, 1);
        assert!(status.queue.is_empty());
    }

    #[test]
    fn test_pair_for_matches_ring() {
        let monitor = Monitor::new(6).unwrap();
        assert_eq!(monitor.pair_for(0), (0, 5));
        assert_eq!(monitor.pair_for(4), (4, 3));

        let lone = Monitor::new(1).unwrap();
        assert_eq!(lone.pair_for(0), (0, 1));
    }

    #[test]
    fn test_poisoned_lock_is_fatal() {
        let monitor = Arc::new(Monitor::new(2).unwrap());

        let crashing = Arc::clone(&monitor);
        let _ = thread::spawn(move || {
            let _guard = crashing.state.lock().unwrap();
            panic!("philosopher choked mid-meal");
        })
        .join();

        let err = monitor.acquire_pair(0).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Poisoned {
                operation: "acquire_pair"
            }
        ));
        assert!(matches!(
            monitor.end_speak(),
            Err(MonitorError::Poisoned { .. })
        ));
    }

    #[test]
    fn test_status_serializes() {
        let monitor = Monitor::new(2).unwrap();
        monitor.acquire_pair(1).unwrap();

        let json = serde_json::to_value(monitor.status().unwrap()).unwrap();
        assert_eq!(json["held_chopsticks"], serde_json::json!([0, 1]));
        assert_eq!(json["grants"], 1);
    }

    #[test]
    fn test_admission_policy_serde_names() {
        let policy: AdmissionPolicy = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(policy, AdmissionPolicy::Legacy);
        assert_eq!(
            serde_json::to_string(&AdmissionPolicy::Strict).unwrap(),
            "\"strict\""
        );
    }
}
