//! Built-in reference tables.

use chrono::NaiveDate;

use super::{
    ActivityLevel, AssetClass, Country, Currency, InvestorProfile, MarketTrend,
    MarketTrendCalendar, ReferenceCatalog, VolatilityClass,
};
use crate::types::{ActivityLevelId, AssetClassId, CountryId, CurrencyId, InvestorProfileId};

const ASSET_CLASSES: &[(&str, VolatilityClass)] = &[
    ("Government Bonds", VolatilityClass::Low),
    ("Corporate Bonds", VolatilityClass::Low),
    ("Large Cap Equity", VolatilityClass::Medium),
    ("Real Estate", VolatilityClass::Medium),
    ("Small Cap Equity", VolatilityClass::High),
    ("Emerging Markets", VolatilityClass::High),
    ("Commodities", VolatilityClass::High),
    ("Cryptocurrency", VolatilityClass::VeryHigh),
];

const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CHF", "Swiss Franc"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("SGD", "Singapore Dollar"),
];

// (code, name, home currency, weight %)
const COUNTRIES: &[(&str, &str, &str, f64)] = &[
    ("US", "United States", "USD", 30.0),
    ("DE", "Germany", "EUR", 12.0),
    ("FR", "France", "EUR", 10.0),
    ("GB", "United Kingdom", "GBP", 12.0),
    ("JP", "Japan", "JPY", 10.0),
    ("CH", "Switzerland", "CHF", 5.0),
    ("CA", "Canada", "CAD", 8.0),
    ("AU", "Australia", "AUD", 7.0),
    ("SG", "Singapore", "SGD", 6.0),
];

const INVESTOR_PROFILES: &[(&str, f64)] = &[
    ("Conservative", 25.0),
    ("Moderate", 35.0),
    ("Growth", 25.0),
    ("Aggressive", 15.0),
];

// (name, transactions per year, weight %)
const ACTIVITY_LEVELS: &[(&str, u32, f64)] = &[
    ("Dormant", 2, 15.0),
    ("Occasional", 12, 35.0),
    ("Regular", 52, 30.0),
    ("Active", 150, 15.0),
    ("Day Trader", 500, 5.0),
];

// (name, start, end, annual strength %)
const MARKET_TRENDS: &[(&str, (i32, u32, u32), (i32, u32, u32), f64)] = &[
    ("COVID-19 crash", (2020, 2, 20), (2020, 3, 23), -300.0),
    ("Pandemic recovery", (2020, 3, 24), (2021, 12, 31), 40.0),
    ("2022 bear market", (2022, 1, 3), (2022, 10, 12), -25.0),
    ("Post-bear recovery", (2022, 10, 13), (2023, 7, 31), 20.0),
    ("AI rally", (2023, 11, 1), (2024, 7, 16), 30.0),
    ("Tariff shock", (2025, 2, 20), (2025, 4, 8), -60.0),
];

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("built-in trend dates are valid")
}

impl ReferenceCatalog {
    /// The built-in catalog: eight asset classes, eight currencies, nine
    /// countries, four investor profiles, five activity levels and the
    /// 2020–2025 market-trend calendar.
    pub fn builtin() -> Self {
        let asset_classes = ASSET_CLASSES
            .iter()
            .zip(1u64..)
            .map(|(&(name, volatility), id)| AssetClass {
                id: AssetClassId::new(id),
                name: name.to_string(),
                volatility,
            })
            .collect();

        let currencies = CURRENCIES
            .iter()
            .zip(1u64..)
            .map(|(&(code, name), id)| Currency {
                id: CurrencyId::new(id),
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();

        let countries = COUNTRIES
            .iter()
            .zip(1u64..)
            .map(|(&(code, name, currency_code, weight), id)| Country {
                id: CountryId::new(id),
                code: code.to_string(),
                name: name.to_string(),
                currency_code: currency_code.to_string(),
                weight,
            })
            .collect();

        let investor_profiles = INVESTOR_PROFILES
            .iter()
            .zip(1u64..)
            .map(|(&(name, weight), id)| InvestorProfile {
                id: InvestorProfileId::new(id),
                name: name.to_string(),
                weight,
            })
            .collect();

        let activity_levels = ACTIVITY_LEVELS
            .iter()
            .zip(1u64..)
            .map(|(&(name, annual_transactions, weight), id)| ActivityLevel {
                id: ActivityLevelId::new(id),
                name: name.to_string(),
                annual_transactions,
                weight,
            })
            .collect();

        let market_trends = MarketTrendCalendar::new(
            MARKET_TRENDS
                .iter()
                .map(|&(name, start, end, strength)| {
                    MarketTrend::new(name, ymd(start), ymd(end), strength)
                })
                .collect(),
        );

        Self {
            asset_classes,
            currencies,
            countries,
            investor_profiles,
            activity_levels,
            market_trends,
        }
    }
}
