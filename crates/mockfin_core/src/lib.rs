//! # mockfin_core: Foundation for Mock Financial Dataset Generation
//!
//! ## Foundation Role
//!
//! mockfin_core is the bottom layer of the generation workspace, providing:
//! - Strongly-typed identifiers and entities (`types`)
//! - Immutable reference catalogs: asset classes, currencies, countries,
//!   investor profiles, activity levels, market trends (`catalog`)
//! - A seedable random source with Box–Muller normals (`rng`)
//! - The weighted discrete sampler (`sampler`)
//! - The typed record model shared by generators and sinks (`record`)
//! - The pull-based generator contract (`generator`)
//!
//! ## Zero Dependency Principle
//!
//! This crate has no dependencies on other mockfin_* crates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use mockfin_core::rng::MockRng;
//! use mockfin_core::sampler::WeightedSampler;
//!
//! let sampler = WeightedSampler::new(vec![("low", 25.0), ("mid", 30.0), ("high", 45.0)]).unwrap();
//! let mut rng = MockRng::from_seed(42);
//! let drawn = sampler.draw(&mut rng);
//! assert!(["low", "mid", "high"].contains(drawn));
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod error;
pub mod generator;
pub mod record;
pub mod rng;
pub mod sampler;
pub mod types;

pub use error::{CatalogError, DateRangeError, GeneratorError, RecordError, SamplerError};
pub use generator::RowGenerator;
pub use record::{Column, ColumnType, Record, Row, Value};
pub use rng::MockRng;
pub use sampler::WeightedSampler;
