//! Record sinks.
//!
//! A sink is prepared with the stage's columns, receives rows one at a
//! time and is completed once the generator is drained. Saving a row never
//! fails: a row that cannot be written is kept as a [`SaveError`] and the
//! stage carries on.

use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use mockfin_core::record::column_names;
use mockfin_core::{Column, Row};

use crate::codec::{render_row, DELIMITER};
use crate::error::StoreError;

/// A row that could not be saved.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveError {
    /// What went wrong
    pub message: String,
    /// The offending row
    pub row: Row,
}

/// Destination for generated rows.
pub trait RecordSink {
    /// Opens the destination and writes the header.
    fn prepare(&mut self, columns: &'static [Column]) -> Result<(), StoreError>;

    /// Saves one row, collecting a [`SaveError`] on failure.
    fn save(&mut self, row: Row);

    /// Flushes and closes the destination.
    fn complete(&mut self) -> Result<(), StoreError>;

    /// Rows that failed to save.
    fn errors(&self) -> &[SaveError];

    /// Number of rows saved successfully.
    fn saved(&self) -> u64;
}

/// Sink writing one flat file.
pub struct FlatFileSink {
    path: PathBuf,
    columns: &'static [Column],
    writer: Option<Writer<BufWriter<File>>>,
    errors: Vec<SaveError>,
    saved: u64,
}

impl FlatFileSink {
    /// Creates a sink for `path`; nothing is opened until `prepare`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            columns: &[],
            writer: None,
            errors: Vec::new(),
            saved: 0,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FlatFileSink {
    fn prepare(&mut self, columns: &'static [Column]) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        // Text fields arrive already qualified.
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(QuoteStyle::Never)
            .from_writer(BufWriter::new(file));
        writer
            .write_record(column_names(columns))
            .map_err(|e| StoreError::csv(&self.path, e))?;

        debug!(path = %self.path.display(), columns = columns.len(), "Prepared flat file sink");
        self.columns = columns;
        self.writer = Some(writer);
        Ok(())
    }

    fn save(&mut self, row: Row) {
        let Some(writer) = self.writer.as_mut() else {
            self.errors.push(SaveError {
                message: StoreError::NotPrepared(self.path.clone()).to_string(),
                row,
            });
            return;
        };

        let fields = match render_row(&row, self.columns) {
            Ok(fields) => fields,
            Err(e) => {
                self.errors.push(SaveError {
                    message: e.to_string(),
                    row,
                });
                return;
            }
        };

        match writer.write_record(&fields) {
            Ok(()) => self.saved += 1,
            Err(e) => self.errors.push(SaveError {
                message: e.to_string(),
                row,
            }),
        }
    }

    fn complete(&mut self) -> Result<(), StoreError> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| StoreError::NotPrepared(self.path.clone()))?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            rows = self.saved,
            errors = self.errors.len(),
            "Flat file written"
        );
        Ok(())
    }

    fn errors(&self) -> &[SaveError] {
        &self.errors
    }

    fn saved(&self) -> u64 {
        self.saved
    }
}
