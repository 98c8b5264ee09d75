//! Mockfin CLI - Mock Financial Dataset Generator
//!
//! Generates assets, prices, users, transactions and holdings into a
//! timestamped run directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mockfin_pipeline::prelude::*;

/// Mock financial dataset generator
#[derive(Parser)]
#[command(name = "mockfin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First simulated date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last simulated date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Number of assets
    #[arg(short, long)]
    assets: Option<u64>,

    /// Number of users
    #[arg(short, long)]
    users: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(date) = self.start_date {
            config.start_date = date;
        }
        if let Some(date) = self.end_date {
            config.end_date = date;
        }
        if let Some(count) = self.assets {
            config.asset_count = count;
        }
        if let Some(count) = self.users {
            config.user_count = count;
        }
        if let Some(dir) = self.output {
            config.output_dir = dir;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PipelineConfig::load_or_default(cli.config.as_deref())
        .and_then(PipelineConfig::with_env_override)
        .context("Failed to load configuration")?;
    let config = cli.apply(config);
    config.validate().context("Invalid configuration")?;

    // Initialise tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_lowercase()))
        .context("Invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let summary = Pipeline::new(config)?.run()?;

    println!("Run directory: {}", summary.run_dir.display());
    println!("Seed: {}", summary.seed);
    println!();
    print!("{}", summary.render_table());

    let warnings: Vec<_> = summary
        .stages
        .iter()
        .flat_map(|s| s.warnings.iter().map(move |w| (s.stage, w)))
        .collect();
    if !warnings.is_empty() {
        println!();
        println!("Warnings ({}):", warnings.len());
        for (stage, warning) in warnings {
            println!("  [{}] {}", stage, warning);
        }
    }

    Ok(())
}
