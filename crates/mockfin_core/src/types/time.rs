//! Simulation window and sentinel date helpers.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use mockfin_core::types::time::DateRange;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! let range = DateRange::new(start, end).unwrap();
//! assert_eq!(range.num_days(), 3);
//! assert_eq!(range.iter().count(), 3);
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DateRangeError;

/// Serialised form of the "never departed" sentinel.
pub const SENTINEL_DATE_STR: &str = "9999-12-31";

/// Far-future date standing in for "no departure".
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Inclusive calendar window `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a window, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the window, counting both ends.
    pub fn num_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    /// True when the window covers more than one calendar day.
    pub fn spans_multiple_days(&self) -> bool {
        self.end > self.start
    }

    /// True when `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every day of the window in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + Days::new(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sentinel_date_value() {
        assert_eq!(sentinel_date(), date(9999, 12, 31));
        assert_eq!(sentinel_date().to_string(), SENTINEL_DATE_STR);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2024, 2, 29), date(2024, 2, 29)).unwrap();
        assert_eq!(range.num_days(), 1);
        assert!(!range.spans_multiple_days());
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![date(2024, 2, 29)]);
    }

    #[test]
    fn test_leap_year_day_count() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(range.num_days(), 366);
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2025, 1, 1)));
    }
}
