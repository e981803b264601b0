//! Error types for the dining monitor.
//!
//! The monitor has a deliberately small failure surface: construction can
//! reject a bad configuration, and any operation can find the monitor lock
//! poisoned. Misuse by callers (releasing chopsticks never taken, ending a
//! speech never started) is not an error; see [`crate::Monitor`].

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur while constructing or driving a [`crate::Monitor`].
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The requested table layout cannot be built.
    #[error("invalid monitor configuration: {0}")]
    InvalidConfig(String),

    /// Another philosopher panicked while holding the monitor lock.
    ///
    /// This is fatal. The monitor performs no rollback, so a philosopher
    /// that was queued or eating at the time of the panic may still own a
    /// queue entry or chopsticks.
    #[error("monitor lock poisoned during {operation}")]
    Poisoned {
        /// Operation that observed the poisoned lock
        operation: &'static str,
    },
}
