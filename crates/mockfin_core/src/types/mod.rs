//! Core domain types for mock dataset generation.
//!
//! This module provides:
//! - Strongly-typed identifiers (`ids`)
//! - Generated entities: assets, prices, users, transactions, holdings (`entities`)
//! - Simulation window and sentinel date helpers (`time`)

pub mod entities;
pub mod ids;
pub mod time;

pub use entities::{Asset, Holding, PricePoint, Transaction, TransactionType, User, UserStatus};
pub use ids::{
    ActivityLevelId, AssetClassId, AssetId, CountryId, CurrencyId, InvestorProfileId,
    TransactionId, UserId,
};
pub use time::{sentinel_date, DateRange, SENTINEL_DATE_STR};
