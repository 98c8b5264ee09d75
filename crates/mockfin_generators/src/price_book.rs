//! Prices indexed by date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use mockfin_core::types::{AssetId, PricePoint};

/// Read-only lookup of which assets are priced on each date.
#[derive(Clone, Debug, Default)]
pub struct PriceBook {
    by_date: BTreeMap<NaiveDate, Vec<(AssetId, Decimal)>>,
}

impl PriceBook {
    /// Indexes `points`; within a date, assets keep their input order.
    pub fn from_points<I: IntoIterator<Item = PricePoint>>(points: I) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<(AssetId, Decimal)>> = BTreeMap::new();
        for point in points {
            by_date
                .entry(point.date)
                .or_default()
                .push((point.asset_id, point.price));
        }
        Self { by_date }
    }

    /// Assets with a price on `date`.
    pub fn priced_on(&self, date: NaiveDate) -> &[(AssetId, Decimal)] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Price of `asset` on `date`.
    pub fn price(&self, asset: AssetId, date: NaiveDate) -> Option<Decimal> {
        self.priced_on(date)
            .iter()
            .find(|(id, _)| *id == asset)
            .map(|(_, price)| *price)
    }

    /// Latest priced date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }

    /// Number of priced dates.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// True when nothing is priced.
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
