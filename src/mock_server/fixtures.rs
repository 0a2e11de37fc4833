//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic PROBA-V products.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::{Geometry, Product, ProductFile};

/// 10-day synthesis, 333 m resolution.
pub const PROBAV_S10_TOC_333M: &str = "PROBAV_L3_S10_TOC_333M";

/// Daily synthesis, 333 m resolution.
pub const PROBAV_S1_TOC_333M: &str = "PROBAV_L3_S1_TOC_333M";

const RADIOMETRY_BANDS: &[&str] = &["PROBAV:RED", "PROBAV:NIR", "PROBAV:BLUE", "PROBAV:SWIR"];
const GEOMETRY_BANDS: &[&str] = &["PROBAV:SZA", "PROBAV:SAA", "PROBAV:VZA", "PROBAV:VAA"];
const QUALITY_BANDS: &[&str] = &["PROBAV:SM", "PROBAV:NDVI"];

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// A ready-made catalog: `(file format, product)` pairs.
pub struct DefaultScenario {
    pub products: Vec<(String, Product)>,
}

impl Fixtures {
    // =========================================================================
    // Product Fixtures
    // =========================================================================

    /// Create a product from raw parts.
    pub fn product(
        product_type: &str,
        tile_x: i32,
        tile_y: i32,
        date: Option<NaiveDate>,
        files: Vec<(String, Vec<String>)>,
    ) -> Product {
        let timestamp = date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive));
        let files = files
            .into_iter()
            .map(|(filename, bands)| ProductFile::new(filename, bands))
            .collect();
        Product::new(
            product_type,
            tile_x,
            tile_y,
            files,
            Some(Self::tile_footprint(tile_x, tile_y)),
            timestamp,
        )
    }

    /// Footprint of a PROBA-V 333 m tile: 10 by 10 degrees, counted from
    /// 180W eastwards and from 75N southwards.
    pub fn tile_footprint(tile_x: i32, tile_y: i32) -> Geometry {
        let min_lon = -180.0 + 10.0 * f64::from(tile_x);
        let max_lat = 75.0 - 10.0 * f64::from(tile_y);
        Geometry::rectangle(min_lon, min_lon + 10.0, max_lat - 10.0, max_lat)
    }

    /// A single-file HDF5 product of the 10-day synthesis.
    pub fn probav_s10_product(tile_x: i32, tile_y: i32, date: NaiveDate) -> Product {
        Self::hdf5_product(PROBAV_S10_TOC_333M, "S10", tile_x, tile_y, date)
    }

    /// A single-file HDF5 product of the daily synthesis.
    pub fn probav_s1_product(tile_x: i32, tile_y: i32, date: NaiveDate) -> Product {
        Self::hdf5_product(PROBAV_S1_TOC_333M, "S1", tile_x, tile_y, date)
    }

    /// A GeoTIFF product of the 10-day synthesis with one file per band group.
    pub fn probav_s10_geotiff_product(tile_x: i32, tile_y: i32, date: NaiveDate) -> Product {
        let stem = Self::file_stem("S10", tile_x, tile_y, date);
        let files = [
            ("RADIOMETRY", RADIOMETRY_BANDS),
            ("GEOMETRY", GEOMETRY_BANDS),
            ("QUALITY", QUALITY_BANDS),
        ]
        .into_iter()
        .map(|(group, bands)| (format!("{stem}_{group}.tif"), Self::band_names(bands)))
        .collect();
        Self::product(PROBAV_S10_TOC_333M, tile_x, tile_y, Some(date), files)
    }

    fn hdf5_product(
        product_type: &str,
        synthesis: &str,
        tile_x: i32,
        tile_y: i32,
        date: NaiveDate,
    ) -> Product {
        let stem = Self::file_stem(synthesis, tile_x, tile_y, date);
        let bands = [RADIOMETRY_BANDS, GEOMETRY_BANDS, QUALITY_BANDS]
            .into_iter()
            .flat_map(Self::band_names)
            .collect();
        Self::product(
            product_type,
            tile_x,
            tile_y,
            Some(date),
            vec![(format!("{stem}.HDF5"), bands)],
        )
    }

    fn file_stem(synthesis: &str, tile_x: i32, tile_y: i32, date: NaiveDate) -> String {
        format!(
            "file:///data/MTDA/PROBAV_L3_{synthesis}_TOC_333M/PROBAV_{synthesis}_TOC_X{tile_x:02}Y{tile_y:02}_{}_333M_V101",
            date.format("%Y%m%d")
        )
    }

    fn band_names(bands: &[&str]) -> Vec<String> {
        bands.iter().map(|b| b.to_string()).collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// The catalog served by [`MockServer::start`](super::MockServer::start).
    ///
    /// - `PROBAV_L3_S10_TOC_333M`: tiles X00Y00, X00Y01 and X18Y02 on
    ///   2016-01-01, 2016-01-11 and 2016-01-21 in HDF5 and GEOTIFF, plus
    ///   X18Y02 on 2017-01-01 in HDF5
    /// - `PROBAV_L3_S1_TOC_333M`: tile X18Y02 on 2016-01-01 to 2016-01-03 in HDF5
    pub fn default_scenario() -> DefaultScenario {
        let mut products = Vec::new();

        for day in [1, 11, 21] {
            let date = NaiveDate::from_ymd_opt(2016, 1, day).expect("valid fixture date");
            for (tile_x, tile_y) in [(0, 0), (0, 1), (18, 2)] {
                products.push((
                    "HDF5".to_string(),
                    Self::probav_s10_product(tile_x, tile_y, date),
                ));
                products.push((
                    "GEOTIFF".to_string(),
                    Self::probav_s10_geotiff_product(tile_x, tile_y, date),
                ));
            }
        }

        let next_year = NaiveDate::from_ymd_opt(2017, 1, 1).expect("valid fixture date");
        products.push(("HDF5".to_string(), Self::probav_s10_product(18, 2, next_year)));

        for day in 1..=3 {
            let date = NaiveDate::from_ymd_opt(2016, 1, day).expect("valid fixture date");
            products.push(("HDF5".to_string(), Self::probav_s1_product(18, 2, date)));
        }

        DefaultScenario { products }
    }
}
