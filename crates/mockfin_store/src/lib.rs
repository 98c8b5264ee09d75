//! # mockfin_store: Flat-Record Persistence
//!
//! Writes generated rows to delimited flat files and reads them back as
//! typed values for the next stage.
//!
//! ## Modules
//!
//! - [`codec`]: Value rendering and parsing
//! - [`sink`]: The [`RecordSink`] contract and the flat-file sink
//! - [`reader`]: Re-reading persisted files into rows and entities
//! - [`layout`]: Run directory layout and purge

pub mod codec;
pub mod error;
pub mod layout;
pub mod reader;
pub mod sink;

pub use error::StoreError;
pub use layout::{OutputLayout, MANIFEST_FILE};
pub use reader::{read_entities, read_records};
pub use sink::{FlatFileSink, RecordSink, SaveError};
