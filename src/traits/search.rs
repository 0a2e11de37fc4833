//! Search trait for querying collections of entities.

use async_trait::async_trait;

use crate::client::CatalogClient;
use crate::error::Result;

/// Search the catalog for entities matching a filter.
///
/// The whole result set is returned by a single request; the catalog does not
/// paginate.
///
/// # Example
///
/// ```ignore
/// use mep_catalog::{CatalogClient, Product, Search, SearchFilter};
///
/// let client = CatalogClient::from_env()?;
/// let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M").for_year(2016);
/// let products = Product::search(&client, &filter).await?;
/// ```
#[async_trait]
pub trait Search: Sized + Send {
    /// Filter type accepted by the search.
    type Filter: Send + Sync;

    /// Fetch all entities matching `filter`.
    ///
    /// # Arguments
    ///
    /// * `client` - The catalog client
    /// * `filter` - Search filter, validated before any request is sent
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid, the request fails, or the
    /// response cannot be mapped.
    async fn search(client: &CatalogClient, filter: &Self::Filter) -> Result<Vec<Self>>;
}
