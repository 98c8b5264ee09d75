//! Market-trend calendar.
//!
//! A trend is a dated period tagged with a signed annual strength in
//! percent. Periods may overlap; lookups return the first trend in
//! calendar order that covers the date.

use chrono::NaiveDate;

/// Trading days per year used to convert annual figures to daily ones.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A dated market regime.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketTrend {
    /// Descriptive label
    pub name: String,
    /// First day of the trend
    pub start: NaiveDate,
    /// Last day of the trend
    pub end: NaiveDate,
    /// Signed annual strength in percent (e.g. `-25.0` for a bear market)
    pub strength: f64,
}

impl MarketTrend {
    /// Creates a trend.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate, strength: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            strength,
        }
    }

    /// True when `date` falls inside the trend period.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Ordered collection of market trends.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mockfin_core::catalog::{MarketTrend, MarketTrendCalendar};
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let calendar = MarketTrendCalendar::new(vec![
///     MarketTrend::new("rally", d(1, 1), d(3, 31), 25.2),
/// ]);
/// assert_eq!(calendar.strength_on(d(2, 1)), Some(25.2));
/// assert_eq!(calendar.strength_on(d(5, 1)), None);
/// assert!((calendar.daily_drift(d(2, 1)) - 0.001).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketTrendCalendar {
    trends: Vec<MarketTrend>,
}

impl MarketTrendCalendar {
    /// Creates a calendar; lookup order is the order given.
    pub fn new(trends: Vec<MarketTrend>) -> Self {
        Self { trends }
    }

    /// All trends in lookup order.
    pub fn trends(&self) -> &[MarketTrend] {
        &self.trends
    }

    /// First trend covering `date`.
    pub fn trend_on(&self, date: NaiveDate) -> Option<&MarketTrend> {
        self.trends.iter().find(|t| t.covers(date))
    }

    /// Strength of the first trend covering `date`.
    pub fn strength_on(&self, date: NaiveDate) -> Option<f64> {
        self.trend_on(date).map(|t| t.strength)
    }

    /// Expected daily log-return for `date`: strength / 100 / 252, or zero
    /// outside every trend.
    pub fn daily_drift(&self, date: NaiveDate) -> f64 {
        self.strength_on(date).unwrap_or(0.0) / 100.0 / TRADING_DAYS_PER_YEAR
    }
}
