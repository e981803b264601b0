//! Philosopher actors and the table that runs them.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use dining_monitor::{Monitor, MonitorStatus};
use tracing::info;

use crate::config::TableConfig;

/// One seat at the table.
#[derive(Debug, Clone)]
pub struct Philosopher {
    id: usize,
    rounds: u32,
    think: Duration,
    eat: Duration,
    talk: Duration,
}

impl Philosopher {
    pub fn new(id: usize, config: &TableConfig) -> Self {
        Self {
            id,
            rounds: config.rounds,
            think: config.think(),
            eat: config.eat(),
            talk: config.talk(),
        }
    }

    /// Thinks, eats and talks for the configured number of rounds.
    ///
    /// Blocks the calling thread; run it off the async executor.
    pub fn run(&self, monitor: &Monitor) -> dining_monitor::Result<()> {
        for round in 0..self.rounds {
            info!(philosopher = self.id, round, "thinking");
            thread::sleep(self.think);

            monitor.acquire_pair(self.id)?;
            info!(philosopher = self.id, round, "eating");
            thread::sleep(self.eat);
            monitor.release_pair(self.id)?;

            // every other round there is something worth saying
            if round % 2 == 0 {
                monitor.request_speak()?;
                info!(philosopher = self.id, round, "speaking");
                thread::sleep(self.talk);
                monitor.end_speak()?;
            }
        }

        info!(philosopher = self.id, "left the table");
        Ok(())
    }
}

/// Seats every philosopher, waits until all of them leave, and returns the
/// final state of the monitor.
pub async fn dine(config: &TableConfig) -> anyhow::Result<MonitorStatus> {
    let monitor = Arc::new(Monitor::with_config(config.monitor_config())?);
    info!(
        philosophers = config.philosophers,
        rounds = config.rounds,
        admission = ?config.admission,
        "table set"
    );

    let handles: Vec<_> = (0..config.philosophers)
        .map(|id| {
            let monitor = Arc::clone(&monitor);
            let philosopher = Philosopher::new(id, config);
            tokio::task::spawn_blocking(move || philosopher.run(&monitor))
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        handle
            .await
            .with_context(|| format!("philosopher {id} panicked"))?
            .with_context(|| format!("philosopher {id} could not finish"))?;
    }

    Ok(monitor.status()?)
}
