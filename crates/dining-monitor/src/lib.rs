//! # Dining Monitor
//!
//! Synchronization controller for N dining philosophers sharing N
//! chopsticks laid out in a ring, plus a single speaking turn.
//!
//! ## Guarantees
//!
//! With the default [`AdmissionPolicy::Strict`]:
//! - **Mutual exclusion**: no chopstick is ever held by two philosophers.
//! - **No deadlock**: chopsticks are granted in pairs, never one at a time.
//! - **No starvation**: waiting philosophers are admitted in arrival order.
//! - **One speaker**: at most one philosopher holds the speaking turn.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Monitor`] | Lock + condition variable over the whole table |
//! | [`ChopstickRing`] | Per-chopstick busy flags with transition checks |
//! | [`FairnessQueue`] | Arrival order of waiting philosophers |
//! | [`MonitorStatus`] | Serializable snapshot for logging and tests |
//!
//! ## Quick Start
//!
//! ```rust
//! use dining_monitor::Monitor;
//!
//! let monitor = Monitor::new(5)?;
//!
//! // Philosopher 2 gets hungry:
//! monitor.acquire_pair(2)?;
//! // ... eat ...
//! monitor.release_pair(2)?;
//!
//! // And has something to say:
//! monitor.request_speak()?;
//! monitor.end_speak()?;
//! # Ok::<(), dining_monitor::MonitorError>(())
//! ```
//!
//! ## Notes
//!
//! - The monitor has no notion of time: no timeouts, no durations.
//! - Callers are trusted to pair every acquire with a release and every
//!   speech request with an end. Nothing is validated.
//! - A panic while the lock is held poisons the monitor for everyone;
//!   see [`MonitorError::Poisoned`].

mod error;
mod monitor;
mod queue;
mod ring;

pub use error::{MonitorError, Result};
pub use monitor::{AdmissionPolicy, Monitor, MonitorConfig, MonitorStatus};
pub use queue::FairnessQueue;
pub use ring::ChopstickRing;
