//! Pull-based generator contract.
//!
//! Every generation stage exposes the same three operations: describe its
//! columns, report whether more rows remain, and produce the next row.
//! Generators are restartable only by reconstruction.

use crate::error::GeneratorError;
use crate::record::Row;

/// Uniform iteration contract implemented by every stage generator.
pub trait RowGenerator {
    /// Ordered field names of the rows this generator produces.
    fn column_names(&self) -> Vec<&'static str>;

    /// Returns true while at least one more row can be pulled.
    fn has_more(&self) -> bool;

    /// Produces the next row.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Exhausted`] when called after
    /// [`has_more`](RowGenerator::has_more) returned false.
    fn next_row(&mut self) -> Result<Row, GeneratorError>;
}

/// Drains a generator into a vector of rows.
///
/// Convenience for tests and small in-memory runs; the pipeline streams
/// rows to a sink instead.
pub fn collect_rows<G: RowGenerator + ?Sized>(generator: &mut G) -> Result<Vec<Row>, GeneratorError> {
    let mut rows = Vec::new();
    while generator.has_more() {
        rows.push(generator.next_row()?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    struct Countdown(u64);

    impl RowGenerator for Countdown {
        fn column_names(&self) -> Vec<&'static str> {
            vec!["n"]
        }

        fn has_more(&self) -> bool {
            self.0 > 0
        }

        fn next_row(&mut self) -> Result<Row, GeneratorError> {
            if self.0 == 0 {
                return Err(GeneratorError::Exhausted("countdown"));
            }
            self.0 -= 1;
            Ok(vec![Value::Id(self.0)])
        }
    }

    #[test]
    fn test_collect_rows_drains_generator() {
        let mut gen = Countdown(3);
        let rows = collect_rows(&mut gen).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(!gen.has_more());
        assert_eq!(gen.next_row(), Err(GeneratorError::Exhausted("countdown")));
    }
}
