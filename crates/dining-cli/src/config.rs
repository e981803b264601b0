//! Table configuration for the `dining` driver.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use dining_monitor::{AdmissionPolicy, MonitorConfig};
use serde::{Deserialize, Serialize};

/// How the table is laid out and how long philosophers dawdle.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Seats at the table.
    pub philosophers: usize,
    /// Think/eat cycles each philosopher runs before leaving.
    pub rounds: u32,
    /// Time spent thinking per round, in milliseconds.
    pub think_ms: u64,
    /// Time spent eating per round, in milliseconds.
    pub eat_ms: u64,
    /// Time spent talking per speech, in milliseconds.
    pub talk_ms: u64,
    /// Admission rule handed to the monitor.
    pub admission: AdmissionPolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            philosophers: 4,
            rounds: 10,
            think_ms: 5,
            eat_ms: 5,
            talk_ms: 2,
            admission: AdmissionPolicy::Strict,
        }
    }
}

impl TableConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Monitor settings derived from this table.
    #[must_use]
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.philosophers).with_admission(self.admission)
    }

    pub fn think(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }

    pub fn eat(&self) -> Duration {
        Duration::from_millis(self.eat_ms)
    }

    pub fn talk(&self) -> Duration {
        Duration::from_millis(self.talk_ms)
    }
}
