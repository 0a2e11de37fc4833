//! Mapping of catalog JSON responses onto the domain model.
//!
//! All catalog schema versions are read through one record shape in which
//! `geometry` and `timestamp` are optional. A batch maps completely or not at
//! all: the first bad record fails the call with
//! [`CatalogError::MalformedRecord`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::models::{parse_timestamp, Geometry, Product, ProductFile, TIMESTAMP_FORMAT};

/// Product record as sent by the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    product_type: String,
    tile_x: i32,
    tile_y: i32,
    files: Vec<FileRecord>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileRecord {
    filename: String,
    bands: Vec<String>,
}

/// Converts JSON arrays returned by the catalog into domain values.
///
/// The mapper is stateless and never performs I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMapper;

impl ResponseMapper {
    /// Map product records, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedRecord`] for the first record that
    /// misses a required key, has a wrong type or a malformed timestamp.
    pub fn products(records: &[Value]) -> Result<Vec<Product>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| Self::product(index, record))
            .collect()
    }

    /// Parse a response body and map its product records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ParseError`] if the body is not a JSON array,
    /// otherwise as [`ResponseMapper::products`].
    pub fn products_from_slice(body: &[u8]) -> Result<Vec<Product>> {
        let records: Vec<Value> = serde_json::from_slice(body)?;
        Self::products(&records)
    }

    /// Map a list of timestamp strings, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedRecord`] for the first entry that is
    /// not a string in the `YYYY-MM-DDTHH:MM:SSZ` pattern.
    pub fn timestamps(values: &[Value]) -> Result<Vec<DateTime<Utc>>> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let text = value.as_str().ok_or_else(|| CatalogError::MalformedRecord {
                    index,
                    reason: format!("expected a timestamp string, got {value}"),
                })?;
                parse_timestamp(text).ok_or_else(|| CatalogError::MalformedRecord {
                    index,
                    reason: format!("timestamp '{text}' does not match {TIMESTAMP_FORMAT}"),
                })
            })
            .collect()
    }

    /// Parse a response body and map its timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ParseError`] if the body is not a JSON array,
    /// otherwise as [`ResponseMapper::timestamps`].
    pub fn timestamps_from_slice(body: &[u8]) -> Result<Vec<DateTime<Utc>>> {
        let values: Vec<Value> = serde_json::from_slice(body)?;
        Self::timestamps(&values)
    }

    /// Map a list of product type names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedRecord`] for the first non-string entry.
    pub fn product_types(values: &[Value]) -> Result<Vec<String>> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| CatalogError::MalformedRecord {
                        index,
                        reason: format!("expected a product type name, got {value}"),
                    })
            })
            .collect()
    }

    /// Parse a response body and map its product type names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ParseError`] if the body is not a JSON array,
    /// otherwise as [`ResponseMapper::product_types`].
    pub fn product_types_from_slice(body: &[u8]) -> Result<Vec<String>> {
        let values: Vec<Value> = serde_json::from_slice(body)?;
        Self::product_types(&values)
    }

    fn product(index: usize, record: &Value) -> Result<Product> {
        let record = ProductRecord::deserialize(record).map_err(|e| {
            CatalogError::MalformedRecord {
                index,
                reason: e.to_string(),
            }
        })?;

        let timestamp = match record.timestamp {
            Some(text) => Some(parse_timestamp(&text).ok_or_else(|| {
                CatalogError::MalformedRecord {
                    index,
                    reason: format!("timestamp '{text}' does not match {TIMESTAMP_FORMAT}"),
                }
            })?),
            None => None,
        };

        let files = record
            .files
            .into_iter()
            .map(|file| ProductFile::new(file.filename, file.bands))
            .collect();

        Ok(Product::new(
            record.product_type,
            record.tile_x,
            record.tile_y,
            files,
            record.geometry,
            timestamp,
        ))
    }
}
