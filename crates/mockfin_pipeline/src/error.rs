//! Error types for the generation pipeline.

use thiserror::Error;

use mockfin_core::{CatalogError, GeneratorError};
use mockfin_store::StoreError;

use crate::stage::Stage;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Reference catalog error
    #[error("Reference catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Output directory or manifest error
    #[error("Output error: {0}")]
    Output(#[from] StoreError),

    /// A generator failed
    #[error("Stage '{stage}' generation failed: {source}")]
    Generation {
        /// Failing stage
        stage: Stage,
        /// Underlying error
        #[source]
        source: GeneratorError,
    },

    /// Persisting or re-reading a stage's records failed
    #[error("Stage '{stage}' persistence failed: {source}")]
    Persistence {
        /// Failing stage
        stage: Stage,
        /// Underlying error
        #[source]
        source: StoreError,
    },

    /// Manifest serialisation error
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl PipelineError {
    /// Create a generation error for `stage`
    pub fn generation(stage: Stage, source: GeneratorError) -> Self {
        Self::Generation { stage, source }
    }

    /// Create a persistence error for `stage`
    pub fn persistence(stage: Stage, source: StoreError) -> Self {
        Self::Persistence { stage, source }
    }

    /// Create a manifest error
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }
}
