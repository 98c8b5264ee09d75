//! Storage error types.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use mockfin_core::RecordError;

/// Errors raised while persisting or re-reading flat records.
///
/// Save errors on individual rows never surface here; sinks collect them
/// as [`crate::SaveError`] values instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Run directory is already present, typically from a run started in
    /// the same second.
    #[error("Run directory {0} already exists")]
    RunDirExists(PathBuf),

    /// File-level I/O failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV framing failure.
    #[error("Malformed flat file {path}: {source}")]
    Csv {
        /// File path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Header row differs from the expected columns.
    #[error("Header mismatch in {path}: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        /// File path
        path: PathBuf,
        /// Expected column names
        expected: Vec<String>,
        /// Column names found in the file
        found: Vec<String>,
    },

    /// A persisted value could not be converted back to its column type.
    #[error("Invalid record at {path} line {line}: {source}")]
    Record {
        /// File path
        path: PathBuf,
        /// One-based line number, header included
        line: u64,
        /// Conversion error
        #[source]
        source: RecordError,
    },

    /// Sink used before `prepare`.
    #[error("Record sink for {0} used before prepare")]
    NotPrepared(PathBuf),
}

impl StoreError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a CSV error for `path`.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
