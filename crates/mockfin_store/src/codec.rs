//! Flat-record value codec.
//!
//! ## Format
//!
//! - Field delimiter `,`, one record per line, header row first
//! - Text wrapped in the qualifier `"`, embedded qualifiers doubled
//! - Decimals with exactly two fraction digits
//! - Dates as `YYYY-MM-DD`, date-times as `YYYY-MM-DDTHH:mm:ssZ`
//! - Identifiers and integers as plain digits
//!
//! # Examples
//!
//! ```
//! use mockfin_core::{ColumnType, Value};
//! use mockfin_store::codec::{parse_value, render_value};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(render_value(&Value::Decimal(Decimal::new(16, 0))), "16.00");
//! assert_eq!(render_value(&Value::Text("say \"hi\"".into())), "\"say \"\"hi\"\"\"");
//! assert_eq!(
//!     parse_value("16.00", ColumnType::Decimal, "amount").unwrap(),
//!     Value::Decimal(Decimal::new(1600, 2)),
//! );
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use mockfin_core::{Column, ColumnType, RecordError, Row, Value};

/// Field delimiter.
pub const DELIMITER: u8 = b',';
/// Text qualifier.
pub const QUALIFIER: u8 = b'"';
/// Date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Date-time format, always UTC.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Fraction digits of rendered decimals.
pub const DECIMAL_PLACES: u32 = 2;

/// Renders one value in its flat-file form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Id(v) => v.to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Decimal(v) => {
            let mut fixed = v.round_dp(DECIMAL_PLACES);
            fixed.rescale(DECIMAL_PLACES);
            fixed.to_string()
        }
        Value::Text(v) => qualify(v),
        Value::Date(v) => v.format(DATE_FORMAT).to_string(),
        Value::DateTime(v) => v.format(DATETIME_FORMAT).to_string(),
    }
}

fn qualify(text: &str) -> String {
    let q = QUALIFIER as char;
    let mut out = String::with_capacity(text.len() + 2);
    out.push(q);
    for ch in text.chars() {
        if ch == q {
            out.push(q);
        }
        out.push(ch);
    }
    out.push(q);
    out
}

/// Renders a row after checking it against `columns`.
///
/// # Errors
///
/// Fails when the row has the wrong number of fields or a field's type
/// differs from its column.
pub fn render_row(row: &[Value], columns: &[Column]) -> Result<Vec<String>, RecordError> {
    mockfin_core::record::check_arity(row, columns)?;
    row.iter()
        .zip(columns)
        .enumerate()
        .map(|(index, (value, column))| {
            if value.column_type() != column.kind {
                return Err(RecordError::TypeMismatch {
                    index,
                    expected: column.kind,
                    found: value.column_type(),
                });
            }
            Ok(render_value(value))
        })
        .collect()
}

/// Parses one unqualified field back into a typed value.
pub fn parse_value(raw: &str, kind: ColumnType, column: &'static str) -> Result<Value, RecordError> {
    let invalid = |reason: String| RecordError::invalid(column, raw, reason);
    match kind {
        ColumnType::Id => raw
            .parse::<u64>()
            .map(Value::Id)
            .map_err(|e| invalid(e.to_string())),
        ColumnType::Integer => raw
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| invalid(e.to_string())),
        ColumnType::Decimal => Decimal::from_str(raw)
            .map(Value::Decimal)
            .map_err(|e| invalid(e.to_string())),
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| invalid(e.to_string())),
        ColumnType::DateTime => NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .map(|dt| Value::DateTime(dt.and_utc()))
            .map_err(|e| invalid(e.to_string())),
    }
}

/// Parses a record's fields against `columns`.
pub fn parse_row<'a, I>(fields: I, columns: &[Column]) -> Result<Row, RecordError>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().collect();
    if fields.len() != columns.len() {
        return Err(RecordError::ArityMismatch {
            expected: columns.len(),
            found: fields.len(),
        });
    }
    fields
        .into_iter()
        .zip(columns)
        .map(|(raw, column)| parse_value(raw, column.kind, column.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_scalars() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let stamp = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        assert_eq!(render_value(&Value::Id(42)), "42");
        assert_eq!(render_value(&Value::Integer(-7)), "-7");
        assert_eq!(render_value(&Value::Date(date)), "2024-03-09");
        assert_eq!(render_value(&Value::DateTime(stamp)), "2024-03-09T07:05:00Z");
    }

    #[test]
    fn test_decimals_have_two_places() {
        assert_eq!(render_value(&Value::Decimal(Decimal::new(5, 1))), "0.50");
        assert_eq!(render_value(&Value::Decimal(Decimal::new(123456, 3))), "123.46");
        assert_eq!(render_value(&Value::Decimal(Decimal::new(1600, 0))), "1600.00");
    }

    #[test]
    fn test_text_qualified() {
        assert_eq!(render_value(&Value::Text("Atlas, Inc".into())), "\"Atlas, Inc\"");
        assert_eq!(render_value(&Value::Text(String::new())), "\"\"");
    }

    #[test]
    fn test_render_row_rejects_type_mismatch() {
        const COLS: &[Column] = &[Column::new("id", ColumnType::Id)];
        let err = render_row(&[Value::Text("1".into())], COLS).unwrap_err();
        assert!(matches!(err, RecordError::TypeMismatch { index: 0, .. }));
        assert!(matches!(
            render_row(&[], COLS),
            Err(RecordError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_values() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_value("9", ColumnType::Id, "id").unwrap(), Value::Id(9));
        assert_eq!(
            parse_value("2024-01-02T03:04:05Z", ColumnType::DateTime, "at").unwrap(),
            Value::DateTime(stamp)
        );
        assert!(parse_value("-1", ColumnType::Id, "id").is_err());
        assert!(parse_value("2024-13-01", ColumnType::Date, "d").is_err());
        let err = parse_value("abc", ColumnType::Decimal, "price").unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_parse_row_arity() {
        const COLS: &[Column] = &[
            Column::new("id", ColumnType::Id),
            Column::new("name", ColumnType::Text),
        ];
        let row = parse_row(["3", "Cedar"], COLS).unwrap();
        assert_eq!(row, vec![Value::Id(3), Value::Text("Cedar".into())]);
        assert!(parse_row(["3"], COLS).is_err());
    }
}
