//! Mock catalog server.
//!
//! Provides an axum-based HTTP server that simulates the catalog REST service.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock catalog server for testing.
///
/// The server runs in the background and can be used to test the catalog
/// client against a realistic implementation of the four catalog endpoints.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        tracing::debug!(%addr, "mock catalog listening");

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `CatalogClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for (file_format, product) in scenario.products {
            state.insert_product(&file_format, product);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/", get(handlers::list_product_types))
            .route("/health", get(health_check))
            .route("/:product_type", get(handlers::search_products))
            .route("/:product_type/times", get(handlers::list_times))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get_times, CatalogClient, Product, Search, SearchFilter};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_search_with_catalog_client() {
        let server = MockServer::start().await;
        let client = CatalogClient::new(server.url()).unwrap();

        let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M")
            .with_date_range("2016-01-01", "2016-01-01");
        let products = Product::search(&client, &filter)
            .await
            .expect("Failed to search products");

        assert_eq!(products.len(), 3);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_times_with_catalog_client() {
        let server = MockServer::start().await;
        let client = CatalogClient::new(server.url()).unwrap();

        let times = get_times(&client, "PROBAV_L3_S1_TOC_333M")
            .await
            .expect("Failed to list times");

        assert_eq!(times.len(), 3);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = CatalogClient::new(server.url()).unwrap();

        let result = Product::search(&client, &SearchFilter::new("PROBAV_L3_S10_TOC_333M")).await;

        assert_eq!(result.unwrap_err().status_code(), Some(404));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let date = chrono::NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let state = MockState::new().with_product("HDF5", Fixtures::probav_s1_product(1, 2, date));

        let server = MockServer::with_state(state).await;
        let client = CatalogClient::new(server.url()).unwrap();

        let products = Product::search(&client, &SearchFilter::new("PROBAV_L3_S1_TOC_333M"))
            .await
            .expect("Failed to search products");

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].tile_x(), 1);

        server.shutdown().await;
    }
}
