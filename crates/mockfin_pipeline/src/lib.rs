//! # mockfin_pipeline: Dataset Generation Runs
//!
//! Wires the stage generators to flat-file persistence and runs them in
//! dependency order: assets, prices, users, transactions, holdings.
//!
//! ## Modules
//!
//! - [`config`]: Run configuration with TOML, environment and validation
//! - [`stage`]: Stage identities and per-stage reports
//! - [`orchestrator`]: The [`Pipeline`](orchestrator::Pipeline) itself
//! - [`manifest`]: Run summary and `manifest.json`
//! - [`error`]: Pipeline error types
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use mockfin_pipeline::prelude::*;
//!
//! let config = PipelineConfig {
//!     asset_count: 5,
//!     user_count: 20,
//!     seed: Some(42),
//!     ..PipelineConfig::default()
//! };
//! let summary = Pipeline::new(config)?.run()?;
//! println!("{}", summary.render_table());
//! # Ok::<(), PipelineError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod stage;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, PipelineConfig};
    pub use crate::error::PipelineError;
    pub use crate::manifest::RunSummary;
    pub use crate::orchestrator::Pipeline;
    pub use crate::stage::{Stage, StageReport};
}
