//! Catalog root handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{error_response, forced_failure};
use crate::mock_server::state::MockState;
use crate::ACCEPT_JSON;

/// GET /
///
/// The catalog only lists product types to clients asking for JSON.
pub async fn list_product_types(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Some(response) = forced_failure(state.forced_status) {
        return response;
    }

    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(ACCEPT_JSON));
    if !accepts_json {
        return error_response(
            StatusCode::NOT_ACCEPTABLE,
            format!("product types are only served as {ACCEPT_JSON}"),
        );
    }

    (StatusCode::OK, Json(state.product_types())).into_response()
}
