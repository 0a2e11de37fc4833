//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur while building, sending or mapping catalog requests.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A mandatory search field is missing or the filter is inconsistent.
    ///
    /// Raised before any network I/O takes place.
    #[error("Invalid search filter: {0}")]
    InvalidFilter(String),

    /// A date given as text could not be parsed.
    #[error("Invalid date '{input}': expected ISO-8601 or a common date format like '1 January 2016'")]
    InvalidDate { input: String },

    /// A JSON record in the response does not match the expected schema.
    ///
    /// The whole batch is rejected; `index` points at the first offending record.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A band was looked up on a product that does not carry it.
    #[error("Band '{band}' not found, available bands: {}", .available.join(", "))]
    BandNotFound {
        band: String,
        available: Vec<String>,
    },

    /// The catalog answered with a non-success HTTP status.
    #[error("Catalog request failed with HTTP {status_code}: {body}")]
    TransportError { status_code: u16, body: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl CatalogError {
    /// The HTTP status code carried by a [`CatalogError::TransportError`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CatalogError::TransportError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = core::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_not_found_lists_available_bands() {
        let err = CatalogError::BandNotFound {
            band: "blabla".to_string(),
            available: vec!["PROBAV:SZA".to_string(), "PROBAV:SM".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'blabla'"));
        assert!(msg.contains("PROBAV:SZA, PROBAV:SM"));
    }

    #[test]
    fn test_status_code_only_for_transport_errors() {
        let err = CatalogError::TransportError {
            status_code: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(CatalogError::InvalidFilter("x".into()).status_code(), None);
    }
}
