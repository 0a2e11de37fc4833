//! Catalog availability listings: product types and acquisition times.

use chrono::{DateTime, Utc};

use crate::client::CatalogClient;
use crate::error::Result;
use crate::mapper::ResponseMapper;

/// Fetch the timestamps for which products of a type are available.
///
/// # Example
///
/// ```ignore
/// use mep_catalog::{get_times, CatalogClient};
///
/// let client = CatalogClient::from_env()?;
/// let times = get_times(&client, "PROBAV_L3_S1_TOC_333M").await?;
/// println!("{} acquisitions, first {:?}", times.len(), times.first());
/// ```
#[tracing::instrument(skip(client))]
pub async fn get_times(client: &CatalogClient, product_type: &str) -> Result<Vec<DateTime<Utc>>> {
    let request = client.query_builder().times(product_type)?;
    let body = client.execute(&request).await?;
    let times = ResponseMapper::timestamps_from_slice(&body)?;

    tracing::debug!(count = times.len(), "mapped timestamps");
    Ok(times)
}

/// Fetch the names of all product types known to the catalog.
#[tracing::instrument(skip(client))]
pub async fn get_product_types(client: &CatalogClient) -> Result<Vec<String>> {
    let request = client.query_builder().product_types();
    let body = client.execute(&request).await?;
    ResponseMapper::product_types_from_slice(&body)
}
