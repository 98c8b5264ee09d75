//! Re-reading persisted flat files.

use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use mockfin_core::{Column, Record, Row};

use crate::codec::{parse_row, DELIMITER, QUALIFIER};
use crate::error::StoreError;

/// Reads every record of `path`, converting fields to the types of
/// `columns`.
///
/// # Errors
///
/// Fails when the file cannot be opened, its header differs from
/// `columns`, or any field cannot be converted.
pub fn read_records(path: &Path, columns: &[Column]) -> Result<Vec<Row>, StoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(DELIMITER)
        .quote(QUALIFIER)
        .double_quote(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let found: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = columns.iter().map(|c| c.name.to_string()).collect();
    if found != expected {
        return Err(StoreError::HeaderMismatch {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StoreError::csv(path, e))?;
        let row = parse_row(record.iter(), columns).map_err(|source| StoreError::Record {
            path: path.to_path_buf(),
            line: index as u64 + 2,
            source,
        })?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Re-read flat file");
    Ok(rows)
}

/// Reads `path` and rebuilds each record as `T`.
pub fn read_entities<T: Record>(path: &Path) -> Result<Vec<T>, StoreError> {
    read_records(path, T::COLUMNS)?
        .iter()
        .enumerate()
        .map(|(index, row)| {
            T::from_row(row).map_err(|source| StoreError::Record {
                path: path.to_path_buf(),
                line: index as u64 + 2,
                source,
            })
        })
        .collect()
}
