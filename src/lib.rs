//! PROBA-V MEP catalog client library.
//!
//! A Rust library for searching the PROBA-V MEP Earth-observation product
//! catalog. Search filters are turned into catalog requests by the
//! [`QueryBuilder`], sent by the [`CatalogClient`], and the JSON answers are
//! mapped onto [`Product`]s by the [`ResponseMapper`].
//!
//! # Quick Start
//!
//! ```no_run
//! use mep_catalog::{CatalogClient, Product, Search, SearchFilter};
//!
//! #[tokio::main]
//! async fn main() -> mep_catalog::Result<()> {
//!     let client = CatalogClient::from_env()?;
//!
//!     // Products of one type within a date range, over the whole globe
//!     let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M")
//!         .with_date_range("2016-01-01", "2016-01-02");
//!     let products = Product::search(&client, &filter).await?;
//!
//!     for product in &products {
//!         println!("{}: {}", product, product.file_for("PROBAV:NDVI")?);
//!     }
//!
//!     // Acquisition times for a product type
//!     let times = mep_catalog::get_times(&client, "PROBAV_L3_S10_TOC_333M").await?;
//!     println!("{} acquisitions", times.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`QueryBuilder`] - validates a [`SearchFilter`] and encodes it as a
//!   [`CatalogRequest`], without any I/O
//! - [`ResponseMapper`] - maps JSON arrays onto products, timestamps and
//!   product type names; a batch maps completely or fails
//! - [`Search`] - implemented by [`Product`] to run a search end to end
//!
//! # Configuration
//!
//! The client reads one optional environment variable:
//!
//! - `MEP_CATALOG_URL` (optional) - Base URL (defaults to [`DEFAULT_BASE_URL`])

mod client;
mod error;
mod mapper;
mod models;
mod query;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{CatalogClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{CatalogError, Result};
pub use mapper::ResponseMapper;
pub use query::{
    BoundingBox, CatalogRequest, DateInput, QueryBuilder, SearchFilter, ACCEPT_JSON,
    DEFAULT_FILE_FORMAT,
};

// Re-export traits
pub use traits::Search;

// Re-export models
pub use models::{Envelope, Geometry, Position, Product, ProductFile, ProductKey, TIMESTAMP_FORMAT};

// Re-export convenience functions
pub use models::{get_product_types, get_products, get_products_for_year, get_times};
