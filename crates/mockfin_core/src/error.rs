//! Error types for structured error handling.
//!
//! This module provides:
//! - `SamplerError`: Errors from weighted sampler construction
//! - `DateRangeError`: Errors from simulation window construction
//! - `CatalogError`: Errors from reference catalog validation
//! - `RecordError`: Errors converting typed records to and from entities
//! - `GeneratorError`: Errors raised while pulling rows from a generator

use thiserror::Error;

use crate::record::ColumnType;

/// Errors from [`WeightedSampler`](crate::sampler::WeightedSampler) construction.
///
/// # Examples
/// ```
/// use mockfin_core::error::SamplerError;
///
/// let err = SamplerError::InvalidTotal(99.5);
/// assert_eq!(format!("{}", err), "Percentages must sum to exactly 100, got 99.5");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// No items were supplied.
    #[error("Weighted sampler requires at least one item")]
    Empty,

    /// An individual percentage lies outside [0, 100].
    #[error("Percentage {percent} at index {index} is outside [0, 100]")]
    PercentOutOfRange {
        /// Position of the offending item
        index: usize,
        /// The offending percentage
        percent: f64,
    },

    /// The percentages do not add up to exactly 100.
    #[error("Percentages must sum to exactly 100, got {0}")]
    InvalidTotal(f64),
}

/// Errors from simulation window construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// End date precedes start date.
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        /// Window start
        start: chrono::NaiveDate,
        /// Window end
        end: chrono::NaiveDate,
    },
}

/// Reference catalog validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A required table has no entries.
    #[error("Reference table '{0}' is empty")]
    EmptyTable(&'static str),

    /// A weight table cannot back a weighted sampler.
    #[error("Reference table '{table}' has invalid weights: {source}")]
    InvalidWeights {
        /// Table name
        table: &'static str,
        /// Underlying sampler error
        #[source]
        source: SamplerError,
    },

    /// Two rows of one table share an identifier.
    #[error("Reference table '{table}' contains duplicate id {id}")]
    DuplicateId {
        /// Table name
        table: &'static str,
        /// Duplicated identifier
        id: u64,
    },

    /// A country names a home currency that is not in the currency table.
    #[error("Country '{country}' references unknown currency '{code}'")]
    UnknownCurrency {
        /// Country code
        country: String,
        /// Missing currency code
        code: String,
    },

    /// An id referenced by generated data is not present in the catalog.
    #[error("Unknown {table} id {id}")]
    UnknownId {
        /// Table name
        table: &'static str,
        /// Missing identifier
        id: u64,
    },
}

/// Errors converting between typed rows and domain entities.
///
/// Raised when a re-read record does not have the shape or content an
/// entity expects. These are fatal at the pipeline level.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Row has the wrong number of fields.
    #[error("Expected {expected} fields, found {found}")]
    ArityMismatch {
        /// Number of columns in the schema
        expected: usize,
        /// Number of fields present
        found: usize,
    },

    /// A field holds a value of the wrong type.
    #[error("Field {index} expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Position of the field
        index: usize,
        /// Type declared by the schema
        expected: ColumnType,
        /// Type actually present
        found: ColumnType,
    },

    /// A field could not be parsed or violates an entity invariant.
    #[error("Invalid value '{value}' for column '{column}': {reason}")]
    InvalidValue {
        /// Column name
        column: &'static str,
        /// Offending serialised value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl RecordError {
    /// Create an invalid value error
    pub fn invalid(column: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by [`RowGenerator`](crate::generator::RowGenerator) implementations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// `next_row` was called after `has_more` returned false.
    #[error("Generator '{0}' has no more rows")]
    Exhausted(&'static str),

    /// The generator was constructed from inconsistent inputs.
    #[error("Invalid generator input: {0}")]
    InvalidInput(String),

    /// Wrapped sampler error
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// Wrapped catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wrapped record error
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl GeneratorError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
