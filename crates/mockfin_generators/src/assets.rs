//! Asset generation.
//!
//! Emits a fixed number of assets with sequential identifiers starting at 1.
//! Each asset draws its class uniformly from the catalog and a display name
//! from two word lists followed by the class name.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use mockfin_core::catalog::ReferenceCatalog;
use mockfin_core::record::column_names;
use mockfin_core::types::{Asset, AssetClassId, AssetId};
use mockfin_core::{CatalogError, GeneratorError, MockRng, Record, Row, RowGenerator};

const NAME_PREFIXES: &[&str] = &[
    "Atlas", "Beacon", "Cedar", "Delta", "Evergreen", "Falcon", "Granite", "Harbor", "Ironwood",
    "Juniper", "Keystone", "Lighthouse", "Meridian", "Northwind", "Orion", "Pinnacle", "Quarry",
    "Redwood", "Summit", "Tidewater",
];

const NAME_SUFFIXES: &[&str] = &[
    "Capital", "Global", "Holdings", "Partners", "Select", "Strategic", "Core", "Growth",
    "Income", "Opportunities",
];

/// Generator for the asset stage.
pub struct AssetGenerator {
    classes: Vec<AssetClassId>,
    class_names: Vec<String>,
    count: u64,
    next_id: u64,
    rng: MockRng,
}

impl AssetGenerator {
    /// Creates a generator emitting `count` assets.
    ///
    /// # Errors
    ///
    /// Fails when `count` is zero or the catalog has no asset classes.
    pub fn new(catalog: &ReferenceCatalog, count: u64, rng: MockRng) -> Result<Self, GeneratorError> {
        if count == 0 {
            return Err(GeneratorError::invalid_input("asset count must be positive"));
        }
        if catalog.asset_classes.is_empty() {
            return Err(CatalogError::EmptyTable("asset_classes").into());
        }
        debug!(count, classes = catalog.asset_classes.len(), "Building asset generator");
        Ok(Self {
            classes: catalog.asset_classes.iter().map(|c| c.id).collect(),
            class_names: catalog.asset_classes.iter().map(|c| c.name.clone()).collect(),
            count,
            next_id: 1,
            rng,
        })
    }

    /// Produces the next asset.
    pub fn next_asset(&mut self) -> Result<Asset, GeneratorError> {
        if !self.has_more() {
            return Err(GeneratorError::Exhausted("assets"));
        }
        let id = AssetId::new(self.next_id);
        self.next_id += 1;

        let index = self.rng.gen_range(0..self.classes.len());
        let prefix = NAME_PREFIXES.choose(&mut self.rng).copied().unwrap_or("Atlas");
        let suffix = NAME_SUFFIXES.choose(&mut self.rng).copied().unwrap_or("Capital");

        Ok(Asset {
            id,
            asset_class_id: self.classes[index],
            name: format!("{} {} {}", prefix, suffix, self.class_names[index]),
        })
    }
}

impl RowGenerator for AssetGenerator {
    fn column_names(&self) -> Vec<&'static str> {
        column_names(Asset::COLUMNS)
    }

    fn has_more(&self) -> bool {
        self.next_id <= self.count
    }

    fn next_row(&mut self) -> Result<Row, GeneratorError> {
        self.next_asset().map(|asset| asset.to_row())
    }
}
