//! Sequential run of the five generation stages.
//!
//! Each stage streams its generator into a flat-file sink. Downstream
//! stages consume what was persisted, re-read from disk, never the
//! in-memory rows. Any fatal error purges the run directory before it is
//! returned.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use mockfin_core::catalog::ReferenceCatalog;
use mockfin_core::types::{Asset, DateRange, Holding, PricePoint, Transaction, User};
use mockfin_core::{Column, MockRng, Record, RowGenerator};
use mockfin_generators::prelude::*;
use mockfin_store::{read_entities, FlatFileSink, OutputLayout, RecordSink, MANIFEST_FILE};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::manifest::RunSummary;
use crate::stage::{Stage, StageReport};

/// Drains `generator` into `sink`, returning the stage report.
///
/// Generator failures are fatal; rows the sink rejects are reported as
/// warnings.
pub fn drain_into<G, S>(
    stage: Stage,
    generator: &mut G,
    sink: &mut S,
    columns: &'static [Column],
) -> Result<StageReport, PipelineError>
where
    G: RowGenerator + ?Sized,
    S: RecordSink + ?Sized,
{
    let started = Instant::now();
    sink.prepare(columns)
        .map_err(|e| PipelineError::persistence(stage, e))?;

    while generator.has_more() {
        let row = generator
            .next_row()
            .map_err(|e| PipelineError::generation(stage, e))?;
        sink.save(row);
    }

    sink.complete()
        .map_err(|e| PipelineError::persistence(stage, e))?;

    for failure in sink.errors() {
        warn!(stage = %stage, error = %failure.message, "Record not saved");
    }

    let elapsed_ms = elapsed_ms(started);
    info!(
        stage = %stage,
        rows = sink.saved(),
        warnings = sink.errors().len(),
        elapsed_ms,
        "Stage completed"
    );
    Ok(StageReport::new(stage, sink.saved(), elapsed_ms, sink.errors()))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Dataset generation pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    catalog: ReferenceCatalog,
}

impl Pipeline {
    /// Creates a pipeline over the built-in catalog.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::with_catalog(config, ReferenceCatalog::builtin())
    }

    /// Creates a pipeline over a custom catalog.
    ///
    /// Both the configuration and the catalog are validated up front.
    pub fn with_catalog(config: PipelineConfig, catalog: ReferenceCatalog) -> Result<Self, PipelineError> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self { config, catalog })
    }

    /// Run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage, stamping the run directory with the current time.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        self.run_at(Utc::now())
    }

    /// Runs every stage with an explicit start time.
    pub fn run_at(&self, started_at: DateTime<Utc>) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| MockRng::from_entropy().seed());
        let window = self.config.window()?;
        let mut layout = OutputLayout::new(&self.config.output_dir, started_at);

        info!(
            run_dir = %layout.run_dir().display(),
            seed,
            start = %window.start(),
            end = %window.end(),
            assets = self.config.asset_count,
            users = self.config.user_count,
            "Starting generation run"
        );

        let outcome = layout
            .create()
            .map_err(PipelineError::from)
            .and_then(|()| self.run_stages(&mut layout, window, seed))
            .and_then(|stages| {
                let summary = RunSummary {
                    run_dir: layout.run_dir().to_path_buf(),
                    seed,
                    generated_at: started_at,
                    config: self.config.clone(),
                    stages,
                    elapsed_ms: elapsed_ms(started),
                };
                summary.write_manifest(&layout.file(MANIFEST_FILE))?;
                Ok(summary)
            });

        match outcome {
            Ok(summary) => {
                info!(
                    run_dir = %summary.run_dir.display(),
                    rows = summary.total_rows(),
                    warnings = summary.warning_count(),
                    elapsed_ms = summary.elapsed_ms,
                    "Generation run completed"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(run_dir = %layout.run_dir().display(), error = %e, "Generation run failed, purging output");
                if let Err(purge_err) = layout.purge() {
                    warn!(error = %purge_err, "Purge incomplete");
                }
                Err(e)
            }
        }
    }

    fn run_stages(
        &self,
        layout: &mut OutputLayout,
        window: DateRange,
        seed: u64,
    ) -> Result<Vec<StageReport>, PipelineError> {
        let mut master = MockRng::from_seed(seed);
        let mut reports = Vec::with_capacity(Stage::ALL.len());

        // Assets
        let stage = Stage::Assets;
        let mut generator = AssetGenerator::new(&self.catalog, self.config.asset_count, master.fork())
            .map_err(|e| PipelineError::generation(stage, e))?;
        let path = persist(stage, &mut generator, Asset::COLUMNS, layout, &mut reports)?;
        let assets: Vec<Asset> = reread(stage, &path)?;

        // Prices
        let stage = Stage::Prices;
        let mut generator = PriceGenerator::new(&assets, window, &self.catalog, master.fork())
            .map_err(|e| PipelineError::generation(stage, e))?;
        debug!(expected_rows = generator.expected_rows(), "Price generator ready");
        let path = persist(stage, &mut generator, PricePoint::COLUMNS, layout, &mut reports)?;
        let prices: Vec<PricePoint> = reread(stage, &path)?;

        // Users
        let stage = Stage::Users;
        let lifecycle = LifecycleSampler::new(
            window,
            self.config.join_after_start_rate,
            self.config.departure_rate,
        )
        .map_err(|e| PipelineError::generation(stage, e))?;
        let mut generator = UserGenerator::new(&self.catalog, lifecycle, self.config.user_count, master.fork())
            .map_err(|e| PipelineError::generation(stage, e))?;
        let path = persist(stage, &mut generator, User::COLUMNS, layout, &mut reports)?;
        let users: Vec<User> = reread(stage, &path)?;

        // Transactions
        let stage = Stage::Transactions;
        let simulator = TransactionSimulator::new(&self.catalog, PriceBook::from_points(prices))
            .map_err(|e| PipelineError::generation(stage, e))?;
        let mut generator = TransactionGenerator::new(simulator, users, master.fork())
            .map_err(|e| PipelineError::generation(stage, e))?;
        let path = persist(stage, &mut generator, Transaction::COLUMNS, layout, &mut reports)?;
        let transactions: Vec<Transaction> = reread(stage, &path)?;

        // Holdings
        let stage = Stage::Holdings;
        let aggregator = HoldingsAggregator::new(&transactions)
            .map_err(|e| PipelineError::generation(stage, e))?;
        let mut generator = HoldingsGenerator::new(&aggregator);
        persist(stage, &mut generator, Holding::COLUMNS, layout, &mut reports)?;

        Ok(reports)
    }
}

fn persist<G: RowGenerator>(
    stage: Stage,
    generator: &mut G,
    columns: &'static [Column],
    layout: &mut OutputLayout,
    reports: &mut Vec<StageReport>,
) -> Result<PathBuf, PipelineError> {
    info!(stage = %stage, "Stage started");
    let path = layout.file(stage.file_name());
    let mut sink = FlatFileSink::new(&path);
    reports.push(drain_into(stage, generator, &mut sink, columns)?);
    Ok(path)
}

fn reread<T: Record>(stage: Stage, path: &Path) -> Result<Vec<T>, PipelineError> {
    let records = read_entities(path).map_err(|e| PipelineError::persistence(stage, e))?;
    debug!(stage = %stage, records = records.len(), "Re-read persisted records");
    Ok(records)
}
