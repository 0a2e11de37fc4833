//! Catalog HTTP client.
//!
//! Executes [`CatalogRequest`]s built by the [`QueryBuilder`] and hands back
//! raw response bodies. Mapping to domain types lives on the model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use url::Url;

use crate::error::{CatalogError, Result};
use crate::query::{CatalogRequest, QueryBuilder};

/// Base URL of the PROBA-V MEP catalog.
pub const DEFAULT_BASE_URL: &str = "http://pdfcatalog.vgt.vito.be:8080/develop/catalog/v2/";

/// Environment variable overriding [`DEFAULT_BASE_URL`] in [`CatalogClient::from_env`].
pub const BASE_URL_ENV: &str = "MEP_CATALOG_URL";

const USER_AGENT: &str = concat!("mep-catalog/", env!("CARGO_PKG_VERSION"));

/// Client for the catalog REST service.
///
/// Only status `200` counts as success; any other status is returned as
/// [`CatalogError::TransportError`]. Requests are never retried.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use mep_catalog::CatalogClient;
///
/// # fn example() -> mep_catalog::Result<()> {
/// // Default catalog, or MEP_CATALOG_URL when set
/// let client = CatalogClient::from_env()?;
///
/// // Or a catalog of your own
/// let client = CatalogClient::new("http://localhost:8080/catalog/v2/")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Arc<Url>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a client for the default catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn with_default_url() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Create a client from the environment.
    ///
    /// Uses `MEP_CATALOG_URL` if set, [`DEFAULT_BASE_URL`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// Create a client for the catalog at `base_url`.
    ///
    /// A trailing slash is added when missing, so product types always
    /// resolve below the base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(CatalogError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A request builder bound to this client's base URL.
    pub fn query_builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.base_url)
    }

    /// Send a GET request and return the body of a `200` response.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn execute(&self, request: &CatalogRequest) -> Result<Vec<u8>> {
        let mut builder = self.http.get(request.url.clone()).query(&request.query);
        if let Some(accept) = request.accept {
            builder = builder.header(header::ACCEPT, accept);
        }

        tracing::debug!(url = %request.full_url(), "sending catalog request");

        let response = builder.send().await.map_err(CatalogError::HttpError)?;
        let response = Self::check_response(response).await?;
        let body = response.bytes().await.map_err(CatalogError::HttpError)?;

        tracing::debug!(bytes = body.len(), "received catalog response");
        Ok(body.to_vec())
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::OK {
            return Ok(response);
        }

        let body = Self::error_body(response, status).await;
        Err(CatalogError::TransportError {
            status_code: status.as_u16(),
            body,
        })
    }

    /// Body of a failed response, or the status line if it cannot be read.
    async fn error_body(response: Response, status: StatusCode) -> String {
        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read error response body");
                format!("HTTP {status}")
            }
        }
    }
}
