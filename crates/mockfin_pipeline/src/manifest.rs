//! Run summary and `manifest.json`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use mockfin_store::StoreError;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::stage::{Stage, StageReport};

/// Timestamp format used in the manifest.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Directory holding the run's files
    pub run_dir: PathBuf,
    /// Seed that reproduces the run
    pub seed: u64,
    /// Run start time
    pub generated_at: DateTime<Utc>,
    /// Effective configuration
    pub config: PipelineConfig,
    /// Per-stage reports in execution order
    pub stages: Vec<StageReport>,
    /// Total wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generated_at: String,
    seed: u64,
    elapsed_ms: u64,
    config: &'a PipelineConfig,
    stages: Vec<ManifestStage>,
}

#[derive(Serialize)]
struct ManifestStage {
    stage: Stage,
    file: &'static str,
    rows: u64,
    elapsed_ms: u64,
    warnings: usize,
}

impl RunSummary {
    /// Rows saved across all stages.
    pub fn total_rows(&self) -> u64 {
        self.stages.iter().map(|s| s.rows).sum()
    }

    /// Save errors across all stages.
    pub fn warning_count(&self) -> usize {
        self.stages.iter().map(|s| s.warnings.len()).sum()
    }

    /// Report for `stage`, if it ran.
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Serialises the manifest as pretty JSON.
    pub fn manifest_json(&self) -> Result<String, PipelineError> {
        let manifest = Manifest {
            generated_at: self.generated_at.format(TIMESTAMP_FORMAT).to_string(),
            seed: self.seed,
            elapsed_ms: self.elapsed_ms,
            config: &self.config,
            stages: self
                .stages
                .iter()
                .map(|s| ManifestStage {
                    stage: s.stage,
                    file: s.stage.file_name(),
                    rows: s.rows,
                    elapsed_ms: s.elapsed_ms,
                    warnings: s.warnings.len(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&manifest).map_err(|e| PipelineError::manifest(e.to_string()))
    }

    /// Writes the manifest to `path`.
    pub fn write_manifest(&self, path: &Path) -> Result<(), PipelineError> {
        let json = self.manifest_json()?;
        fs::write(path, json).map_err(|e| PipelineError::Output(StoreError::io(path, e)))
    }

    /// Renders the stage summary as a plain-text table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<14} {:>10} {:>12} {:>9}", "Stage", "Rows", "Elapsed ms", "Warnings");
        let _ = writeln!(out, "{}", "-".repeat(48));
        for report in &self.stages {
            let _ = writeln!(
                out,
                "{:<14} {:>10} {:>12} {:>9}",
                report.stage.name(),
                report.rows,
                report.elapsed_ms,
                report.warnings.len()
            );
        }
        let _ = writeln!(out, "{}", "-".repeat(48));
        let _ = writeln!(
            out,
            "{:<14} {:>10} {:>12} {:>9}",
            "total",
            self.total_rows(),
            self.elapsed_ms,
            self.warning_count()
        );
        out
    }
}
