//! Typed record model shared by generators and record sinks.
//!
//! Generators emit [`Row`]s of typed [`Value`]s; sinks render them into the
//! flat-record format and readers parse them back using the [`Column`]
//! schema each entity publishes through the [`Record`] trait.
//!
//! # Examples
//!
//! ```
//! use mockfin_core::record::{ColumnType, Value};
//! use rust_decimal::Decimal;
//!
//! let value = Value::Decimal(Decimal::new(12345, 2));
//! assert_eq!(value.column_type(), ColumnType::Decimal);
//! assert_eq!(value.as_decimal(0).unwrap(), Decimal::new(12345, 2));
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Semantic type of a record field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Opaque unsigned identifier, rendered as plain digits.
    Id,
    /// Signed integer, rendered as plain digits.
    Integer,
    /// Fixed-point decimal, rendered with two fraction digits.
    Decimal,
    /// Free text, wrapped in the string qualifier.
    Text,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// UTC timestamp, `YYYY-MM-DDTHH:mm:ssZ`.
    DateTime,
}

/// A single typed field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Identifier value
    Id(u64),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Text value
    Text(String),
    /// Date value
    Date(NaiveDate),
    /// Timestamp value
    DateTime(DateTime<Utc>),
}

/// An ordered list of values matching a generator's column names.
pub type Row = Vec<Value>;

/// A named, typed column in an entity schema.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column header name
    pub name: &'static str,
    /// Semantic field type
    pub kind: ColumnType,
}

impl Column {
    /// Creates a column definition.
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

/// Returns the header names of a schema in order.
pub fn column_names(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|c| c.name).collect()
}

impl Value {
    /// Returns the semantic type of this value.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Id(_) => ColumnType::Id,
            Value::Integer(_) => ColumnType::Integer,
            Value::Decimal(_) => ColumnType::Decimal,
            Value::Text(_) => ColumnType::Text,
            Value::Date(_) => ColumnType::Date,
            Value::DateTime(_) => ColumnType::DateTime,
        }
    }

    fn mismatch(&self, index: usize, expected: ColumnType) -> RecordError {
        RecordError::TypeMismatch {
            index,
            expected,
            found: self.column_type(),
        }
    }

    /// Extracts an identifier, reporting `index` on mismatch.
    pub fn as_id(&self, index: usize) -> Result<u64, RecordError> {
        match self {
            Value::Id(v) => Ok(*v),
            other => Err(other.mismatch(index, ColumnType::Id)),
        }
    }

    /// Extracts an integer, reporting `index` on mismatch.
    pub fn as_integer(&self, index: usize) -> Result<i64, RecordError> {
        match self {
            Value::Integer(v) => Ok(*v),
            other => Err(other.mismatch(index, ColumnType::Integer)),
        }
    }

    /// Extracts a decimal, reporting `index` on mismatch.
    pub fn as_decimal(&self, index: usize) -> Result<Decimal, RecordError> {
        match self {
            Value::Decimal(v) => Ok(*v),
            other => Err(other.mismatch(index, ColumnType::Decimal)),
        }
    }

    /// Extracts text, reporting `index` on mismatch.
    pub fn as_text(&self, index: usize) -> Result<&str, RecordError> {
        match self {
            Value::Text(v) => Ok(v),
            other => Err(other.mismatch(index, ColumnType::Text)),
        }
    }

    /// Extracts a date, reporting `index` on mismatch.
    pub fn as_date(&self, index: usize) -> Result<NaiveDate, RecordError> {
        match self {
            Value::Date(v) => Ok(*v),
            other => Err(other.mismatch(index, ColumnType::Date)),
        }
    }

    /// Extracts a timestamp, reporting `index` on mismatch.
    pub fn as_datetime(&self, index: usize) -> Result<DateTime<Utc>, RecordError> {
        match self {
            Value::DateTime(v) => Ok(*v),
            other => Err(other.mismatch(index, ColumnType::DateTime)),
        }
    }
}

/// An entity that can be written as a typed row and rebuilt from one.
pub trait Record: Sized {
    /// Ordered schema of the entity's flat representation.
    const COLUMNS: &'static [Column];

    /// Converts the entity into a row matching [`Record::COLUMNS`].
    fn to_row(&self) -> Row;

    /// Rebuilds the entity from a row, validating arity, types and invariants.
    fn from_row(row: &[Value]) -> Result<Self, RecordError>;
}

/// Checks that `row` has exactly as many fields as `columns`.
pub fn check_arity(row: &[Value], columns: &[Column]) -> Result<(), RecordError> {
    if row.len() != columns.len() {
        return Err(RecordError::ArityMismatch {
            expected: columns.len(),
            found: row.len(),
        });
    }
    Ok(())
}
