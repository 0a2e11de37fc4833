//! Product model and band lookup.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::mapper::ResponseMapper;
use crate::models::{format_timestamp, Geometry};
use crate::query::{BoundingBox, SearchFilter};
use crate::traits::Search;

/// An EO data product returned from a catalog search.
///
/// A product is one indexed granule, identified by its type, tile and
/// acquisition time, and made up of one or more files. Products are built
/// by [`ResponseMapper`](crate::ResponseMapper) and are immutable afterwards.
///
/// Serializes back to the catalog's record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    product_type: String,
    tile_x: i32,
    tile_y: i32,
    files: Vec<ProductFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    geometry: Option<Geometry>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    timestamp: Option<DateTime<Utc>>,
}

/// Identity of a product: `(product type, tile x, tile y, timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey {
    pub product_type: String,
    pub tile_x: i32,
    pub tile_y: i32,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A single file of a product and the bands it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFile {
    filename: String,
    bands: Vec<String>,
}

impl ProductFile {
    pub(crate) fn new(filename: impl Into<String>, bands: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            bands,
        }
    }

    /// The file name, usually a `file://` URI.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Band names stored in this file, in catalog order.
    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Whether this file holds `band` (exact, case-sensitive match).
    pub fn contains_band(&self, band: &str) -> bool {
        self.bands.iter().any(|b| b == band)
    }
}

impl fmt::Display for ProductFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

impl Product {
    pub(crate) fn new(
        product_type: impl Into<String>,
        tile_x: i32,
        tile_y: i32,
        files: Vec<ProductFile>,
        geometry: Option<Geometry>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            product_type: product_type.into(),
            tile_x,
            tile_y,
            files,
            geometry,
            timestamp,
        }
    }

    /// The product type (e.g. `PROBAV_L3_S10_TOC_333M`).
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Horizontal tile index.
    pub fn tile_x(&self) -> i32 {
        self.tile_x
    }

    /// Vertical tile index.
    pub fn tile_y(&self) -> i32 {
        self.tile_y
    }

    /// Files making up this product, in catalog order.
    pub fn files(&self) -> &[ProductFile] {
        &self.files
    }

    /// Footprint of the product. Absent on older catalog versions.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Acquisition timestamp. Absent on the oldest catalog version.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// The identity of this product.
    pub fn key(&self) -> ProductKey {
        ProductKey {
            product_type: self.product_type.clone(),
            tile_x: self.tile_x,
            tile_y: self.tile_y,
            timestamp: self.timestamp,
        }
    }

    /// All bands of all files, in file order. Duplicates are kept.
    pub fn bands(&self) -> Vec<&str> {
        self.files
            .iter()
            .flat_map(|file| file.bands.iter().map(String::as_str))
            .collect()
    }

    /// The file name of the first file containing `band`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BandNotFound`] with the full band list if no
    /// file declares the band.
    pub fn file_for(&self, band: &str) -> Result<&str> {
        self.files
            .iter()
            .find(|file| file.contains_band(band))
            .map(|file| file.filename.as_str())
            .ok_or_else(|| CatalogError::BandNotFound {
                band: band.to_string(),
                available: self.bands().into_iter().map(str::to_string).collect(),
            })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.product_type, self.tile_x, self.tile_y)
    }
}

#[async_trait]
impl Search for Product {
    type Filter = SearchFilter;

    #[tracing::instrument(skip(client))]
    async fn search(client: &CatalogClient, filter: &Self::Filter) -> Result<Vec<Self>> {
        let request = client.query_builder().products(filter)?;
        let body = client.execute(&request).await?;
        let products = ResponseMapper::products_from_slice(&body)?;

        tracing::debug!(count = products.len(), "mapped products");
        Ok(products)
    }
}

// Convenience functions for product searches

/// Fetch all products matching a filter.
///
/// # Example
///
/// ```ignore
/// use chrono::NaiveDate;
/// use mep_catalog::{get_products, CatalogClient, SearchFilter};
///
/// let client = CatalogClient::from_env()?;
/// let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M").with_date_range(
///     NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2016, 1, 2).unwrap(),
/// );
/// let products = get_products(&client, &filter).await?;
/// ```
pub async fn get_products(client: &CatalogClient, filter: &SearchFilter) -> Result<Vec<Product>> {
    Product::search(client, filter).await
}

/// Fetch all products of a type for one year.
///
/// # Arguments
///
/// * `client` - The catalog client
/// * `product_type` - The product type (e.g., "PROBAV_L3_S10_TOC_333M")
/// * `year` - The year to search
/// * `file_format` - The file format (e.g., "HDF5", "GEOTIFF")
/// * `bbox` - Region of interest; `None` searches the whole globe
pub async fn get_products_for_year(
    client: &CatalogClient,
    product_type: &str,
    year: i32,
    file_format: &str,
    bbox: Option<BoundingBox>,
) -> Result<Vec<Product>> {
    let filter = SearchFilter::new(product_type)
        .with_format(file_format)
        .for_year(year)
        .with_bbox(bbox.unwrap_or_default());
    Product::search(client, &filter).await
}

fn serialize_timestamp<S>(
    timestamp: &Option<DateTime<Utc>>,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timestamp {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}
