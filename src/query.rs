//! Search filters and catalog request construction.
//!
//! [`QueryBuilder`] turns a [`SearchFilter`] into a [`CatalogRequest`]: the
//! URL to call and the string-encoded query parameters. Building a request
//! never performs I/O; identical inputs always produce identical requests.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

use crate::error::{CatalogError, Result};
use crate::models::Envelope;

/// File format requested when none is given.
pub const DEFAULT_FILE_FORMAT: &str = "HDF5";

/// `Accept` header value required by the product type listing.
pub const ACCEPT_JSON: &str = "application/json";

const DATE_PARAM_FORMAT: &str = "%Y%m%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// Day-first for the numeric slash/dot forms.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y%m%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// A date bound for a search, either already parsed or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// A calendar date.
    Date(NaiveDate),
    /// An instant; only its UTC date is used.
    DateTime(DateTime<Utc>),
    /// Text in ISO-8601 or a common human format (`1 January 2016`,
    /// `Jan 1, 2016`, `01/01/2016`).
    Text(String),
}

impl DateInput {
    /// Resolve this input to a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDate`] if text cannot be parsed.
    pub fn to_date(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::DateTime(dt) => Ok(dt.date_naive()),
            DateInput::Text(text) => parse_date_text(text),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::DateTime(dt)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

fn parse_date_text(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(CatalogError::InvalidDate {
        input: text.to_string(),
    })
}

/// Region of interest for a search.
///
/// Each coordinate is sent as its own query parameter. A `None` coordinate is
/// left out of the request so the catalog applies its own default for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
}

impl BoundingBox {
    /// A fully specified bounding box.
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon: Some(min_lon),
            max_lon: Some(max_lon),
            min_lat: Some(min_lat),
            max_lat: Some(max_lat),
        }
    }

    /// The whole globe: -180/180/-90/90.
    pub fn globe() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    /// No coordinates at all; every bound is left to the catalog.
    pub fn unbounded() -> Self {
        Self {
            min_lon: None,
            max_lon: None,
            min_lat: None,
            max_lat: None,
        }
    }

    /// The box as an envelope, with unset bounds widened to the globe.
    pub fn envelope(&self) -> Envelope {
        Envelope {
            min_lon: self.min_lon.unwrap_or(-180.0),
            max_lon: self.max_lon.unwrap_or(180.0),
            min_lat: self.min_lat.unwrap_or(-90.0),
            max_lat: self.max_lat.unwrap_or(90.0),
        }
    }

    fn params(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("minLon", self.min_lon),
            ("maxLon", self.max_lon),
            ("minLat", self.min_lat),
            ("maxLat", self.max_lat),
        ]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::globe()
    }
}

/// Filters for a product search.
///
/// `product_type` and `file_format` are mandatory. A search is scoped either
/// by a date range or by a year, never both.
///
/// # Example
///
/// ```
/// use mep_catalog::{BoundingBox, SearchFilter};
///
/// let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M")
///     .with_date_range("2016-01-01", "2016-01-02")
///     .with_bbox(BoundingBox::new(0.0, 10.0, 45.0, 55.0));
/// assert_eq!(filter.file_format.as_deref(), Some("HDF5"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    /// Product family, e.g. `PROBAV_L3_S10_TOC_333M`.
    pub product_type: Option<String>,

    /// File format, `HDF5` unless overridden.
    pub file_format: Option<String>,

    /// First day of the range (inclusive).
    pub start_date: Option<DateInput>,

    /// Last day of the range (inclusive).
    pub end_date: Option<DateInput>,

    /// Year scope, alternative to a date range.
    pub year: Option<i32>,

    /// Region of interest, the whole globe by default.
    pub bbox: BoundingBox,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            product_type: None,
            file_format: Some(DEFAULT_FILE_FORMAT.to_string()),
            start_date: None,
            end_date: None,
            year: None,
            bbox: BoundingBox::default(),
        }
    }
}

impl SearchFilter {
    /// A filter for all products of a type, in the default file format.
    pub fn new(product_type: impl Into<String>) -> Self {
        Self {
            product_type: Some(product_type.into()),
            ..Default::default()
        }
    }

    /// Set the file format.
    pub fn with_format(mut self, file_format: impl Into<String>) -> Self {
        self.file_format = Some(file_format.into());
        self
    }

    /// Restrict to an inclusive date range.
    pub fn with_date_range(
        mut self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Set only the start of the date range.
    pub fn with_start_date(mut self, start: impl Into<DateInput>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    /// Set only the end of the date range.
    pub fn with_end_date(mut self, end: impl Into<DateInput>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    /// Restrict to a single year.
    pub fn for_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the region of interest.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Check mandatory fields and mutually exclusive scopes.
    ///
    /// Returns the product type and file format on success.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidFilter`] if the product type or file
    /// format is missing or empty, if the product type is not a single path
    /// segment, if both a date range and a year are set, or if a bounding
    /// box coordinate is not finite.
    pub fn validate(&self) -> Result<(&str, &str)> {
        let product_type = self
            .product_type
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| CatalogError::InvalidFilter("product type is mandatory".to_string()))?;
        validate_product_type(product_type)?;

        let file_format = self
            .file_format
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| CatalogError::InvalidFilter("file format is mandatory".to_string()))?;

        if self.year.is_some() && (self.start_date.is_some() || self.end_date.is_some()) {
            return Err(CatalogError::InvalidFilter(
                "a search is scoped by a date range or by a year, not both".to_string(),
            ));
        }

        for (name, value) in self.bbox.params() {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(CatalogError::InvalidFilter(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        Ok((product_type, file_format))
    }
}

fn validate_product_type(product_type: &str) -> Result<()> {
    if product_type.starts_with('/') || product_type.contains("://") {
        return Err(CatalogError::InvalidFilter(format!(
            "product type '{product_type}' must be relative to the catalog base URL"
        )));
    }
    if product_type == "." || product_type == ".." {
        return Err(CatalogError::InvalidFilter(format!(
            "product type '{product_type}' is not a valid path segment"
        )));
    }
    Ok(())
}

/// A fully built catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    /// Endpoint URL, without query string.
    pub url: Url,
    /// Query parameters, keyed by name.
    pub query: BTreeMap<&'static str, String>,
    /// Required `Accept` header, if any.
    pub accept: Option<&'static str>,
}

impl CatalogRequest {
    fn get(url: Url) -> Self {
        Self {
            url,
            query: BTreeMap::new(),
            accept: None,
        }
    }

    /// The endpoint URL with the query string appended.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }
}

/// Builds [`CatalogRequest`]s relative to a catalog base URL.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    base_url: &'a Url,
}

impl<'a> QueryBuilder<'a> {
    /// Create a builder for the given base URL.
    ///
    /// Every path segment of `base_url` is kept, whether or not it ends with
    /// a slash: `http://host/catalog/v2` and `http://host/catalog/v2/` both
    /// yield `http://host/catalog/v2/{productType}`. This differs from a
    /// relative URL join, which would drop `v2` from the first form.
    /// [`CatalogClient::new`](crate::CatalogClient::new) normalizes the base
    /// to end with a slash, so both behaviours agree there.
    pub fn new(base_url: &'a Url) -> Self {
        Self { base_url }
    }

    /// Request for products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidFilter`] for a filter that fails
    /// [`SearchFilter::validate`] and [`CatalogError::InvalidDate`] for date
    /// text that cannot be parsed.
    pub fn products(&self, filter: &SearchFilter) -> Result<CatalogRequest> {
        let (product_type, file_format) = filter.validate()?;

        let mut request = CatalogRequest::get(self.join(&[product_type])?);
        request.query.insert("format", file_format.to_string());

        if let Some(start) = &filter.start_date {
            request.query.insert("startDate", encode_date(start)?);
        }
        if let Some(end) = &filter.end_date {
            request.query.insert("endDate", encode_date(end)?);
        }
        if let Some(year) = filter.year {
            request.query.insert("year", year.to_string());
        }
        for (name, value) in filter.bbox.params() {
            if let Some(value) = value {
                request.query.insert(name, encode_float(value));
            }
        }

        Ok(request)
    }

    /// Request for the timestamps available for a product type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidFilter`] for an empty or non-relative
    /// product type.
    pub fn times(&self, product_type: &str) -> Result<CatalogRequest> {
        if product_type.trim().is_empty() {
            return Err(CatalogError::InvalidFilter(
                "product type is mandatory".to_string(),
            ));
        }
        validate_product_type(product_type)?;

        Ok(CatalogRequest::get(self.join(&[product_type, "times"])?))
    }

    /// Request for all product types known to the catalog.
    pub fn product_types(&self) -> CatalogRequest {
        let mut request = CatalogRequest::get(self.base_url.clone());
        request.accept = Some(ACCEPT_JSON);
        request
    }

    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CatalogError::InvalidFilter(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn encode_date(input: &DateInput) -> Result<String> {
    Ok(input.to_date()?.format(DATE_PARAM_FORMAT).to_string())
}

// f64's Display is plain decimal and drops a zero fraction: -180.0 => "-180".
fn encode_float(value: f64) -> String {
    value.to_string()
}
