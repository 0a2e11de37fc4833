//! Mock server state management.
//!
//! Provides the in-memory product store for the mock catalog server.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::{BoundingBox, Product};

/// A product together with the file format it is published in.
#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub file_format: String,
    pub product: Product,
}

/// Temporal scope of a search as understood by the mock server.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeScope {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub year: Option<i32>,
}

impl TimeScope {
    fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.year.is_none()
    }

    fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        self.start.map_or(true, |start| date >= start)
            && self.end.map_or(true, |end| date <= end)
            && self.year.map_or(true, |year| chrono::Datelike::year(&date) == year)
    }
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Products indexed by product type.
    pub products: BTreeMap<String, Vec<StoredProduct>>,

    /// When set, every catalog endpoint answers with this HTTP status.
    pub forced_status: Option<u16>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a product published in `file_format`.
    pub fn with_product(mut self, file_format: &str, product: Product) -> Self {
        self.insert_product(file_format, product);
        self
    }

    /// Make every catalog endpoint fail with `status`.
    pub fn with_forced_status(mut self, status: u16) -> Self {
        self.forced_status = Some(status);
        self
    }

    /// Add a product published in `file_format`.
    pub fn insert_product(&mut self, file_format: &str, product: Product) {
        self.products
            .entry(product.product_type().to_string())
            .or_default()
            .push(StoredProduct {
                file_format: file_format.to_string(),
                product,
            });
    }

    /// All known product types, sorted.
    pub fn product_types(&self) -> Vec<String> {
        self.products.keys().cloned().collect()
    }

    /// Whether any product of this type is stored.
    pub fn has_product_type(&self, product_type: &str) -> bool {
        self.products.contains_key(product_type)
    }

    /// Distinct timestamps of a product type, ascending.
    pub fn times(&self, product_type: &str) -> Vec<DateTime<Utc>> {
        let mut times: Vec<DateTime<Utc>> = self
            .products
            .get(product_type)
            .into_iter()
            .flatten()
            .filter_map(|stored| stored.product.timestamp())
            .collect();
        times.sort();
        times.dedup();
        times
    }

    /// Products of a type and format within a time scope and bounding box.
    ///
    /// Products without a timestamp only match an unbounded time scope;
    /// products without a geometry match any bounding box.
    pub fn search(
        &self,
        product_type: &str,
        file_format: &str,
        scope: TimeScope,
        bbox: BoundingBox,
    ) -> Vec<&Product> {
        let envelope = bbox.envelope();
        self.products
            .get(product_type)
            .into_iter()
            .flatten()
            .filter(|stored| stored.file_format.eq_ignore_ascii_case(file_format))
            .map(|stored| &stored.product)
            .filter(|product| match product.timestamp() {
                Some(ts) => scope.contains(ts),
                None => scope.is_unbounded(),
            })
            .filter(|product| {
                product
                    .geometry()
                    .and_then(|geometry| geometry.bounds())
                    .map_or(true, |bounds| bounds.intersects(&envelope))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_state_add_and_list_product_types() {
        let state = MockState::new()
            .with_product("HDF5", Fixtures::probav_s10_product(0, 0, date(2016, 1, 1)))
            .with_product("HDF5", Fixtures::probav_s1_product(18, 3, date(2016, 1, 1)));

        assert_eq!(
            state.product_types(),
            vec!["PROBAV_L3_S10_TOC_333M", "PROBAV_L3_S1_TOC_333M"]
        );
        assert!(state.has_product_type("PROBAV_L3_S1_TOC_333M"));
        assert!(!state.has_product_type("UNKNOWN"));
    }

    #[test]
    fn test_state_times_are_sorted_and_distinct() {
        let state = MockState::new()
            .with_product("HDF5", Fixtures::probav_s10_product(0, 1, date(2016, 1, 11)))
            .with_product("HDF5", Fixtures::probav_s10_product(0, 0, date(2016, 1, 1)))
            .with_product("HDF5", Fixtures::probav_s10_product(0, 1, date(2016, 1, 1)));

        let times = state.times("PROBAV_L3_S10_TOC_333M");
        assert_eq!(times.len(), 2);
        assert!(times[0] < times[1]);
    }

    #[test]
    fn test_state_search_filters() {
        let state = MockState::new()
            .with_product("HDF5", Fixtures::probav_s10_product(0, 0, date(2016, 1, 1)))
            .with_product("HDF5", Fixtures::probav_s10_product(18, 3, date(2016, 1, 11)))
            .with_product("GEOTIFF", Fixtures::probav_s10_product(0, 0, date(2016, 1, 1)));

        let all = state.search(
            "PROBAV_L3_S10_TOC_333M",
            "HDF5",
            TimeScope::default(),
            BoundingBox::globe(),
        );
        assert_eq!(all.len(), 2);

        let january_first = TimeScope {
            start: Some(date(2016, 1, 1)),
            end: Some(date(2016, 1, 1)),
            year: None,
        };
        let by_date = state.search(
            "PROBAV_L3_S10_TOC_333M",
            "HDF5",
            january_first,
            BoundingBox::globe(),
        );
        assert_eq!(by_date.len(), 1);

        // Tile X18Y03 covers 0..10E, 35..45N
        let europe = BoundingBox::new(2.0, 8.0, 40.0, 44.0);
        let by_bbox = state.search(
            "PROBAV_L3_S10_TOC_333M",
            "hdf5",
            TimeScope::default(),
            europe,
        );
        assert_eq!(by_bbox.len(), 1);
        assert_eq!(by_bbox[0].tile_x(), 18);
    }
}
