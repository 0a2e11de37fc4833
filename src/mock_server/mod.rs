//! Mock catalog server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the catalog
//! REST service for integration and end-to-end testing. Unlike wiremock,
//! which mocks at the HTTP level per-test, this server actually evaluates
//! search filters against its product store, so whole workflows can be
//! exercised against it.
//!
//! # Example
//!
//! ```ignore
//! use mep_catalog::mock_server::MockServer;
//! use mep_catalog::{CatalogClient, Product, Search, SearchFilter};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = CatalogClient::new(server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M").for_year(2016);
//!     let products = Product::search(&client, &filter).await.unwrap();
//!     assert!(!products.is_empty());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, StoredProduct, TimeScope};
