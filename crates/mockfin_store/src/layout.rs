//! Output directory layout for one run.
//!
//! Every run writes into `<output_dir>/run_<YYYYMMDD>_<HHMMSS>/`. A run
//! never reuses an existing directory. The layout remembers each file
//! handed out so that a failed run can be purged completely.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::StoreError;

/// Manifest file name inside the run directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of one run's output.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    run_dir: PathBuf,
    files: Vec<PathBuf>,
    created: bool,
}

impl OutputLayout {
    /// Lays out a run started at `started_at` under `output_dir`.
    pub fn new(output_dir: impl AsRef<Path>, started_at: DateTime<Utc>) -> Self {
        let name = format!("run_{}", started_at.format("%Y%m%d_%H%M%S"));
        Self {
            run_dir: output_dir.as_ref().join(name),
            files: Vec::new(),
            created: false,
        }
    }

    /// Run directory.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Creates the run directory and any missing parents.
    ///
    /// Fails with [`StoreError::RunDirExists`] when the run directory is
    /// already present; its contents are left untouched.
    pub fn create(&mut self) -> Result<(), StoreError> {
        let create_err = |source| StoreError::CreateDir {
            path: self.run_dir.clone(),
            source,
        };
        if let Some(parent) = self.run_dir.parent() {
            fs::create_dir_all(parent).map_err(create_err)?;
        }
        match fs::create_dir(&self.run_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::RunDirExists(self.run_dir.clone()));
            }
            Err(e) => return Err(create_err(e)),
        }
        self.created = true;
        info!(run_dir = %self.run_dir.display(), "Created run directory");
        Ok(())
    }

    /// Path of `file_name` inside the run directory, recorded for purge.
    pub fn file(&mut self, file_name: &str) -> PathBuf {
        let path = self.run_dir.join(file_name);
        if !self.files.contains(&path) {
            self.files.push(path.clone());
        }
        path
    }

    /// Files handed out so far.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Deletes every recorded file and the run directory.
    ///
    /// Returns the number of files removed. Does nothing unless
    /// [`create`](Self::create) succeeded, so a directory owned by another
    /// run is never touched.
    pub fn purge(&mut self) -> Result<usize, StoreError> {
        if !self.created {
            self.files.clear();
            return Ok(0);
        }

        let mut removed = 0;
        for path in self.files.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }

        if let Err(e) = fs::remove_dir_all(&self.run_dir) {
            if e.kind() != ErrorKind::NotFound {
                warn!(run_dir = %self.run_dir.display(), error = %e, "Run directory left in place");
            }
        }
        self.created = false;

        info!(run_dir = %self.run_dir.display(), files = removed, "Purged run output");
        Ok(removed)
    }
}
