//! Dining philosophers CLI - seats a table and lets it run to completion

mod config;
mod philosopher;

use std::path::PathBuf;

use clap::Parser;
use dining_monitor::AdmissionPolicy;
use tracing_subscriber::EnvFilter;

use crate::config::TableConfig;

#[derive(Parser)]
#[command(name = "dining")]
#[command(about = "Dining philosophers sharing chopsticks through a fair monitor")]
struct Cli {
    /// Number of philosophers at the table
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    philosophers: Option<u32>,

    /// Think/eat rounds per philosopher
    #[arg(short, long)]
    rounds: Option<u32>,

    /// JSON table configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the historical admission predicate (may double-hold chopsticks)
    #[arg(long)]
    legacy: bool,

    /// Log monitor activity at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn table(&self) -> anyhow::Result<TableConfig> {
        let mut table = match &self.config {
            Some(path) => TableConfig::load(path)?,
            None => TableConfig::default(),
        };

        if let Some(philosophers) = self.philosophers {
            table.philosophers = philosophers as usize;
        }
        if let Some(rounds) = self.rounds {
            table.rounds = rounds;
        }
        if self.legacy {
            table.admission = AdmissionPolicy::Legacy;
        }
        Ok(table)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let table = cli.table()?;
    let status = philosopher::dine(&table).await?;

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
