//! # Stage Generators
//!
//! Pull-based generators for each stage of a mock financial dataset run.
//! Every generator implements [`mockfin_core::RowGenerator`] and receives
//! its own seeded [`mockfin_core::MockRng`].
//!
//! ## Modules
//!
//! - [`assets`]: Tradable assets with uniformly drawn asset classes
//! - [`prices`]: Daily price paths driven by volatility and market trends
//! - [`lifecycle`]: Join and departure dates per user
//! - [`users`]: Users with weighted profile, activity and country
//! - [`price_book`]: Prices indexed by date for the transaction stage
//! - [`transactions`]: Per-user trading activity and departure liquidation
//! - [`holdings`]: Net positions aggregated from transactions

pub mod assets;
pub mod holdings;
pub mod lifecycle;
pub mod price_book;
pub mod prices;
pub mod transactions;
pub mod users;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::AssetGenerator;
    pub use crate::holdings::{HoldingsAggregator, HoldingsGenerator};
    pub use crate::lifecycle::{Lifecycle, LifecycleSampler};
    pub use crate::price_book::PriceBook;
    pub use crate::prices::{PriceGenerator, PriceProcess};
    pub use crate::transactions::{CurrencyPreference, TransactionGenerator, TransactionSimulator};
    pub use crate::users::UserGenerator;
}
