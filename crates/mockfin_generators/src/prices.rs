//! Daily price paths.
//!
//! ## Model
//!
//! Each asset follows a discrete geometric random walk with one step per
//! calendar day:
//!
//! ```text
//! S(t+1) = S(t) * exp(drift(t+1) + sigma_daily * Z)
//! ```
//!
//! where `drift` is the strength of the first market trend covering the
//! date divided by 100 and by 252, `sigma_daily = annual_vol * sqrt(1/252)`
//! from the asset's volatility class, and `Z` is a Box–Muller standard
//! normal. The first date of the window carries the initial price.
//!
//! Rows come out date-major, asset-minor; only the current price of each
//! asset is kept in memory.

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use mockfin_core::catalog::{MarketTrendCalendar, ReferenceCatalog, VolatilityClass};
use mockfin_core::record::column_names;
use mockfin_core::types::{Asset, AssetClassId, AssetId, DateRange, PricePoint};
use mockfin_core::{CatalogError, GeneratorError, MockRng, Record, Row, RowGenerator};

/// Lower bound of the uniform initial price.
pub const MIN_INITIAL_PRICE: f64 = 10.0;
/// Exclusive upper bound of the uniform initial price.
pub const MAX_INITIAL_PRICE: f64 = 1000.0;

/// Smallest price ever emitted.
pub fn price_floor() -> Decimal {
    Decimal::new(1, 2)
}

/// One-step price evolution under the trend calendar.
#[derive(Clone, Debug, Default)]
pub struct PriceProcess {
    trends: MarketTrendCalendar,
}

impl PriceProcess {
    /// Creates a process driven by `trends`.
    pub fn new(trends: MarketTrendCalendar) -> Self {
        Self { trends }
    }

    /// Evolves `price` onto `date` given a standard normal `shock`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use mockfin_core::catalog::{MarketTrendCalendar, VolatilityClass};
    /// use mockfin_generators::prices::PriceProcess;
    ///
    /// let process = PriceProcess::new(MarketTrendCalendar::default());
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    /// // No trend and no shock leaves the price unchanged.
    /// assert_eq!(process.step(100.0, date, VolatilityClass::High, 0.0), 100.0);
    /// ```
    pub fn step(&self, price: f64, date: NaiveDate, volatility: VolatilityClass, shock: f64) -> f64 {
        let drift = self.trends.daily_drift(date);
        price * (drift + volatility.daily_volatility() * shock).exp()
    }

    /// Evolves `price` onto `date` drawing the shock from `rng`.
    pub fn advance(&self, price: f64, date: NaiveDate, volatility: VolatilityClass, rng: &mut MockRng) -> f64 {
        let shock = rng.gen_standard_normal();
        self.step(price, date, volatility, shock)
    }
}

/// Converts a simulated price to its emitted two-decimal form.
pub fn quantize_price(price: f64) -> Result<Decimal, GeneratorError> {
    let decimal = Decimal::from_f64(price)
        .ok_or_else(|| GeneratorError::invalid_input(format!("price {} is not representable", price)))?;
    Ok(decimal.round_dp(2).max(price_floor()))
}

/// Generator for the price stage.
pub struct PriceGenerator {
    process: PriceProcess,
    assets: Vec<(AssetId, VolatilityClass)>,
    current: Vec<f64>,
    dates: DateRange,
    date: NaiveDate,
    day_index: u64,
    asset_index: usize,
    rng: MockRng,
}

impl PriceGenerator {
    /// Creates a generator over `assets` for every date of `dates`.
    ///
    /// # Errors
    ///
    /// Fails when `assets` is empty or an asset references an asset class
    /// missing from the catalog.
    pub fn new(
        assets: &[Asset],
        dates: DateRange,
        catalog: &ReferenceCatalog,
        mut rng: MockRng,
    ) -> Result<Self, GeneratorError> {
        if assets.is_empty() {
            return Err(GeneratorError::invalid_input("price generation requires at least one asset"));
        }

        let volatility: HashMap<AssetClassId, VolatilityClass> = catalog
            .asset_classes
            .iter()
            .map(|c| (c.id, c.volatility))
            .collect();

        let assets = assets
            .iter()
            .map(|asset| {
                volatility
                    .get(&asset.asset_class_id)
                    .map(|v| (asset.id, *v))
                    .ok_or(CatalogError::UnknownId {
                        table: "asset_classes",
                        id: asset.asset_class_id.get(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let current = assets
            .iter()
            .map(|_| rng.gen_range(MIN_INITIAL_PRICE..MAX_INITIAL_PRICE))
            .collect();

        debug!(
            assets = assets.len(),
            days = dates.num_days(),
            start = %dates.start(),
            end = %dates.end(),
            "Building price generator"
        );

        Ok(Self {
            process: PriceProcess::new(catalog.market_trends.clone()),
            assets,
            current,
            dates,
            date: dates.start(),
            day_index: 0,
            asset_index: 0,
            rng,
        })
    }

    /// Total rows this generator will emit.
    pub fn expected_rows(&self) -> u64 {
        self.dates.num_days() * self.assets.len() as u64
    }

    /// Produces the next price point.
    pub fn next_price(&mut self) -> Result<PricePoint, GeneratorError> {
        if !self.has_more() {
            return Err(GeneratorError::Exhausted("prices"));
        }

        let (asset_id, volatility) = self.assets[self.asset_index];
        if self.day_index > 0 {
            let evolved = self.process.advance(
                self.current[self.asset_index],
                self.date,
                volatility,
                &mut self.rng,
            );
            self.current[self.asset_index] = evolved;
        }
        let point = PricePoint {
            asset_id,
            date: self.date,
            price: quantize_price(self.current[self.asset_index])?,
        };

        self.asset_index += 1;
        if self.asset_index == self.assets.len() {
            self.asset_index = 0;
            self.day_index += 1;
            if let Some(next) = self.date.succ_opt() {
                self.date = next;
            }
        }
        Ok(point)
    }
}

impl RowGenerator for PriceGenerator {
    fn column_names(&self) -> Vec<&'static str> {
        column_names(PricePoint::COLUMNS)
    }

    fn has_more(&self) -> bool {
        self.day_index < self.dates.num_days()
    }

    fn next_row(&mut self) -> Result<Row, GeneratorError> {
        self.next_price().map(|point| point.to_row())
    }
}
