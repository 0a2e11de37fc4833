//! Product search and availability handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{error_response, forced_failure};
use crate::mock_server::state::{MockState, TimeScope};
use crate::models::format_timestamp;
use crate::BoundingBox;

/// Query parameters for a product search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsQuery {
    pub format: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub year: Option<i32>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
}

fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y%m%d")
                .map_err(|_| format!("{name} must be formatted as YYYYMMDD, got '{v}'"))
        })
        .transpose()
}

/// GET /{product_type}
pub async fn search_products(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(product_type): Path<String>,
    Query(query): Query<SearchProductsQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Some(response) = forced_failure(state.forced_status) {
        return response;
    }

    let Some(format) = query.format.as_deref() else {
        return error_response(StatusCode::BAD_REQUEST, "format is required".to_string());
    };

    let scope = match (
        parse_date_param("startDate", query.start_date.as_deref()),
        parse_date_param("endDate", query.end_date.as_deref()),
    ) {
        (Ok(start), Ok(end)) => TimeScope {
            start,
            end,
            year: query.year,
        },
        (Err(message), _) | (_, Err(message)) => {
            return error_response(StatusCode::BAD_REQUEST, message)
        }
    };

    if !state.has_product_type(&product_type) {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown product type: {product_type}"),
        );
    }

    let bbox = BoundingBox {
        min_lon: query.min_lon,
        max_lon: query.max_lon,
        min_lat: query.min_lat,
        max_lat: query.max_lat,
    };
    let products = state.search(&product_type, format, scope, bbox);

    (StatusCode::OK, Json(products)).into_response()
}

/// GET /{product_type}/times
pub async fn list_times(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(product_type): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Some(response) = forced_failure(state.forced_status) {
        return response;
    }

    if !state.has_product_type(&product_type) {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown product type: {product_type}"),
        );
    }

    let times: Vec<String> = state
        .times(&product_type)
        .iter()
        .map(format_timestamp)
        .collect();

    (StatusCode::OK, Json(times)).into_response()
}
