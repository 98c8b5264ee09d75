//! Immutable reference catalogs.
//!
//! Lookup tables the generators draw from: asset classes with their
//! volatility bands, currencies, countries with home currencies and
//! population weights, investor profiles, activity levels, and the
//! market-trend calendar.
//!
//! # Examples
//!
//! ```
//! use mockfin_core::catalog::ReferenceCatalog;
//!
//! let catalog = ReferenceCatalog::builtin();
//! catalog.validate().unwrap();
//! assert!(!catalog.asset_classes.is_empty());
//! ```

mod builtin;
mod market_trend;

pub use market_trend::{MarketTrend, MarketTrendCalendar, TRADING_DAYS_PER_YEAR};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CatalogError;
use crate::sampler::WeightedSampler;
use crate::types::{ActivityLevelId, AssetClassId, CountryId, CurrencyId, InvestorProfileId};

/// Currency codes preferred as a user's international currency.
pub const MAJOR_CURRENCY_CODES: [&str; 2] = ["USD", "EUR"];

/// Coarse annualised volatility band of an asset class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityClass {
    /// Around 10% annual volatility
    Low,
    /// Around 20% annual volatility
    Medium,
    /// Around 35% annual volatility
    High,
    /// Around 50% annual volatility
    VeryHigh,
}

impl VolatilityClass {
    /// Annualised volatility as a fraction.
    pub fn annual_volatility(&self) -> f64 {
        match self {
            VolatilityClass::Low => 0.10,
            VolatilityClass::Medium => 0.20,
            VolatilityClass::High => 0.35,
            VolatilityClass::VeryHigh => 0.50,
        }
    }

    /// Daily volatility: `annual * sqrt(1 / 252)`.
    pub fn daily_volatility(&self) -> f64 {
        self.annual_volatility() * (1.0 / TRADING_DAYS_PER_YEAR).sqrt()
    }
}

/// An asset class.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetClass {
    /// Identifier
    pub id: AssetClassId,
    /// Display name
    pub name: String,
    /// Volatility band
    pub volatility: VolatilityClass,
}

/// A currency.
#[derive(Clone, Debug, PartialEq)]
pub struct Currency {
    /// Identifier
    pub id: CurrencyId,
    /// ISO 4217 code
    pub code: String,
    /// Display name
    pub name: String,
}

/// A country of residence.
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    /// Identifier
    pub id: CountryId,
    /// ISO 3166 alpha-2 code
    pub code: String,
    /// Display name
    pub name: String,
    /// ISO 4217 code of the home currency
    pub currency_code: String,
    /// Share of users residing here, in percent
    pub weight: f64,
}

/// An investor risk profile.
#[derive(Clone, Debug, PartialEq)]
pub struct InvestorProfile {
    /// Identifier
    pub id: InvestorProfileId,
    /// Display name
    pub name: String,
    /// Share of users with this profile, in percent
    pub weight: f64,
}

/// A trading activity level.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityLevel {
    /// Identifier
    pub id: ActivityLevelId,
    /// Display name
    pub name: String,
    /// Expected transactions per year
    pub annual_transactions: u32,
    /// Share of users at this level, in percent
    pub weight: f64,
}

/// The full set of reference tables for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceCatalog {
    /// Asset classes
    pub asset_classes: Vec<AssetClass>,
    /// Currencies
    pub currencies: Vec<Currency>,
    /// Countries
    pub countries: Vec<Country>,
    /// Investor profiles
    pub investor_profiles: Vec<InvestorProfile>,
    /// Activity levels
    pub activity_levels: Vec<ActivityLevel>,
    /// Market-trend calendar
    pub market_trends: MarketTrendCalendar,
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_unique<I: IntoIterator<Item = u64>>(table: &'static str, ids: I) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { table, id });
        }
    }
    Ok(())
}

fn weighted<T>(table: &'static str, pairs: Vec<(T, f64)>) -> Result<WeightedSampler<T>, CatalogError> {
    WeightedSampler::new(pairs).map_err(|source| CatalogError::InvalidWeights { table, source })
}

impl ReferenceCatalog {
    /// Checks every table is non-empty, identifiers are unique, weights
    /// form valid distributions and countries reference known currencies.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.asset_classes.is_empty() {
            return Err(CatalogError::EmptyTable("asset_classes"));
        }
        if self.currencies.is_empty() {
            return Err(CatalogError::EmptyTable("currencies"));
        }
        if self.countries.is_empty() {
            return Err(CatalogError::EmptyTable("countries"));
        }
        if self.investor_profiles.is_empty() {
            return Err(CatalogError::EmptyTable("investor_profiles"));
        }
        if self.activity_levels.is_empty() {
            return Err(CatalogError::EmptyTable("activity_levels"));
        }

        check_unique("asset_classes", self.asset_classes.iter().map(|c| c.id.get()))?;
        check_unique("currencies", self.currencies.iter().map(|c| c.id.get()))?;
        check_unique("countries", self.countries.iter().map(|c| c.id.get()))?;
        check_unique("investor_profiles", self.investor_profiles.iter().map(|p| p.id.get()))?;
        check_unique("activity_levels", self.activity_levels.iter().map(|a| a.id.get()))?;

        for country in &self.countries {
            self.home_currency(country.id)?;
        }

        self.country_sampler()?;
        self.investor_profile_sampler()?;
        self.activity_level_sampler()?;
        Ok(())
    }

    /// Looks up an asset class.
    pub fn asset_class(&self, id: AssetClassId) -> Option<&AssetClass> {
        self.asset_classes.iter().find(|c| c.id == id)
    }

    /// Looks up a currency by identifier.
    pub fn currency(&self, id: CurrencyId) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.id == id)
    }

    /// Looks up a currency by ISO code.
    pub fn currency_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Looks up a country.
    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    /// Looks up an activity level.
    pub fn activity_level(&self, id: ActivityLevelId) -> Option<&ActivityLevel> {
        self.activity_levels.iter().find(|a| a.id == id)
    }

    /// Home currency of a country.
    pub fn home_currency(&self, country_id: CountryId) -> Result<&Currency, CatalogError> {
        let country = self.country(country_id).ok_or(CatalogError::UnknownId {
            table: "countries",
            id: country_id.get(),
        })?;
        self.currency_by_code(&country.currency_code)
            .ok_or_else(|| CatalogError::UnknownCurrency {
                country: country.code.clone(),
                code: country.currency_code.clone(),
            })
    }

    /// Designated major currencies present in the catalog, in preference order.
    pub fn major_currencies(&self) -> Vec<&Currency> {
        MAJOR_CURRENCY_CODES
            .iter()
            .filter_map(|code| self.currency_by_code(code))
            .collect()
    }

    /// Sampler over countries by population weight.
    pub fn country_sampler(&self) -> Result<WeightedSampler<CountryId>, CatalogError> {
        weighted(
            "countries",
            self.countries.iter().map(|c| (c.id, c.weight)).collect(),
        )
    }

    /// Sampler over investor profiles by weight.
    pub fn investor_profile_sampler(&self) -> Result<WeightedSampler<InvestorProfileId>, CatalogError> {
        weighted(
            "investor_profiles",
            self.investor_profiles.iter().map(|p| (p.id, p.weight)).collect(),
        )
    }

    /// Sampler over activity levels by weight.
    pub fn activity_level_sampler(&self) -> Result<WeightedSampler<ActivityLevelId>, CatalogError> {
        weighted(
            "activity_levels",
            self.activity_levels.iter().map(|a| (a.id, a.weight)).collect(),
        )
    }
}
