//! HTTP request handlers for the mock server.

pub mod catalog;
pub mod products;

pub use catalog::*;
pub use products::*;

use axum::{http::StatusCode, response::IntoResponse, Json};

/// JSON error body in the shape the catalog uses.
pub(crate) fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (
        status,
        Json(serde_json::json!({
            "error": status.canonical_reason().unwrap_or("error"),
            "message": message
        })),
    )
        .into_response()
}

/// Response for a state with a forced failure status.
pub(crate) fn forced_failure(status: Option<u16>) -> Option<axum::response::Response> {
    let status = StatusCode::from_u16(status?).ok()?;
    Some(error_response(status, "forced failure".to_string()))
}
