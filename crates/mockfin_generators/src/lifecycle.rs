//! User lifecycle sampling.
//!
//! Assigns each user a join date, a departure date and a status inside the
//! simulation window. A configurable share of users joins after the window
//! opens and a configurable share departs before it closes.

use chrono::NaiveDate;
use tracing::debug;

use mockfin_core::types::{sentinel_date, DateRange, UserStatus};
use mockfin_core::{GeneratorError, MockRng};

/// Default share of users joining after the window start.
pub const DEFAULT_JOIN_AFTER_START_RATE: f64 = 0.30;
/// Default share of users departing before the window end.
pub const DEFAULT_DEPARTURE_RATE: f64 = 0.20;

/// Sampled lifecycle of one user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    /// Join date
    pub join_date: NaiveDate,
    /// Real departure date, or the sentinel
    pub departure_date: NaiveDate,
    /// Status consistent with the departure date
    pub status: UserStatus,
}

impl Lifecycle {
    fn active(join_date: NaiveDate) -> Self {
        Self {
            join_date,
            departure_date: sentinel_date(),
            status: UserStatus::Active,
        }
    }

    fn departed(join_date: NaiveDate, departure_date: NaiveDate) -> Self {
        Self {
            join_date,
            departure_date,
            status: UserStatus::Departed,
        }
    }
}

/// Samples join/departure dates within a window.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mockfin_core::MockRng;
/// use mockfin_core::types::DateRange;
/// use mockfin_generators::lifecycle::LifecycleSampler;
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let sampler = LifecycleSampler::with_defaults(DateRange::new(day, day).unwrap());
/// let lifecycle = sampler.sample(&mut MockRng::from_seed(1));
/// assert_eq!(lifecycle.join_date, day);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct LifecycleSampler {
    window: DateRange,
    join_after_start_rate: f64,
    departure_rate: f64,
}

impl LifecycleSampler {
    /// Creates a sampler with explicit rates.
    ///
    /// # Errors
    ///
    /// Fails when either rate lies outside [0, 1].
    pub fn new(window: DateRange, join_after_start_rate: f64, departure_rate: f64) -> Result<Self, GeneratorError> {
        for (name, rate) in [
            ("join_after_start_rate", join_after_start_rate),
            ("departure_rate", departure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GeneratorError::invalid_input(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        debug!(
            start = %window.start(),
            end = %window.end(),
            join_after_start_rate,
            departure_rate,
            "Building lifecycle sampler"
        );
        Ok(Self {
            window,
            join_after_start_rate,
            departure_rate,
        })
    }

    /// Creates a sampler with the default 30% / 20% rates.
    pub fn with_defaults(window: DateRange) -> Self {
        Self {
            window,
            join_after_start_rate: DEFAULT_JOIN_AFTER_START_RATE,
            departure_rate: DEFAULT_DEPARTURE_RATE,
        }
    }

    /// Simulation window.
    pub fn window(&self) -> DateRange {
        self.window
    }

    /// Draws one lifecycle.
    pub fn sample(&self, rng: &mut MockRng) -> Lifecycle {
        let start = self.window.start();
        let end = self.window.end();

        let joins_late = rng.gen_uniform() <= self.join_after_start_rate;
        let join_date = if joins_late && self.window.spans_multiple_days() {
            rng.gen_date_after(start, end).unwrap_or(start)
        } else {
            start
        };

        let departs = rng.gen_uniform() <= self.departure_rate;
        if !departs {
            return Lifecycle::active(join_date);
        }

        if !self.window.spans_multiple_days() {
            // Single-day window: departure coincides with the join day.
            return Lifecycle::departed(start, start);
        }

        match rng.gen_date_after(join_date, end) {
            Some(departure) => Lifecycle::departed(join_date, departure),
            None => Lifecycle::active(join_date),
        }
    }
}
