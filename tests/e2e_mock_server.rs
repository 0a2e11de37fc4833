//! E2E tests using the mock catalog server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use chrono::{Datelike, NaiveDate};
use mep_catalog::mock_server::{Fixtures, MockServer, MockState};
use mep_catalog::{
    get_product_types, get_products_for_year, get_times, BoundingBox, CatalogClient,
    CatalogError, Product, Search, SearchFilter,
};

const S10: &str = "PROBAV_L3_S10_TOC_333M";
const S1: &str = "PROBAV_L3_S1_TOC_333M";

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Discovery Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_discover_types_then_times_then_products() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    // Step 1: List product types
    let types = get_product_types(&client)
        .await
        .expect("Failed to list product types");
    assert_eq!(types, vec![S10, S1]);

    // Step 2: List acquisition times of the daily synthesis
    let times = get_times(&client, S1).await.expect("Failed to list times");
    assert_eq!(times.len(), 3);

    // Step 3: Search products for the first acquisition
    let first = times[0].date_naive();
    let filter = SearchFilter::new(S1).with_date_range(first, first);
    let products = Product::search(&client, &filter)
        .await
        .expect("Failed to search products");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].timestamp(), Some(times[0]));

    server.shutdown().await;
}

// =============================================================================
// Search Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_search_by_date_range_is_inclusive() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    let filter = SearchFilter::new(S10).with_date_range("2016-01-01", "2016-01-11");
    let products = Product::search(&client, &filter).await.unwrap();

    // Three tiles on two dekads
    assert_eq!(products.len(), 6);
    assert!(products.iter().all(|p| p.files().len() == 1));

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_by_year() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    let products_2016 = get_products_for_year(&client, S10, 2016, "HDF5", None).await.unwrap();
    let products_2017 = get_products_for_year(&client, S10, 2017, "HDF5", None).await.unwrap();

    assert_eq!(products_2016.len(), 9);
    assert_eq!(products_2017.len(), 1);
    assert_eq!(products_2017[0].timestamp().unwrap().year(), 2017);

    // Belgium lies in tile X18Y02
    let belgium = BoundingBox::new(2.5, 6.4, 49.5, 51.5);
    let over_belgium = get_products_for_year(&client, S10, 2016, "HDF5", Some(belgium))
        .await
        .unwrap();
    assert_eq!(over_belgium.len(), 3);
    assert!(over_belgium.iter().all(|p| p.tile_x() == 18 && p.tile_y() == 2));

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_geotiff_and_lookup_bands() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    let filter = SearchFilter::new(S10)
        .with_format("GEOTIFF")
        .with_date_range("2016-01-21", "2016-01-21");
    let products = Product::search(&client, &filter).await.unwrap();
    assert_eq!(products.len(), 3);

    let product = products
        .iter()
        .find(|p| p.tile_x() == 0 && p.tile_y() == 1)
        .expect("tile X00Y01 present");

    assert!(product
        .file_for("PROBAV:NDVI")
        .unwrap()
        .ends_with("X00Y01_20160121_333M_V101_QUALITY.tif"));

    match product.file_for("blabla") {
        Err(CatalogError::BandNotFound { band, available }) => {
            assert_eq!(band, "blabla");
            assert_eq!(available.len(), product.bands().len());
        }
        other => panic!("expected BandNotFound, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_by_bounding_box() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    // Belgium lies in tile X18Y02
    let filter = SearchFilter::new(S10)
        .for_year(2016)
        .with_bbox(BoundingBox::new(2.5, 6.4, 49.5, 51.5));
    let products = Product::search(&client, &filter).await.unwrap();

    assert_eq!(products.len(), 3);
    assert!(products.iter().all(|p| p.tile_x() == 18 && p.tile_y() == 2));
    assert!(products.iter().all(|p| p.geometry().is_some()));

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_products_keep_identity() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    let filter = SearchFilter::new(S10).for_year(2016);
    let first = Product::search(&client, &filter).await.unwrap();
    let second = Product::search(&client, &filter).await.unwrap();

    let keys: Vec<_> = first.iter().map(Product::key).collect();
    assert_eq!(keys, second.iter().map(Product::key).collect::<Vec<_>>());

    server.shutdown().await;
}

// =============================================================================
// Error Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_product_type() {
    let server = MockServer::start().await;
    let client = CatalogClient::new(server.url()).unwrap();

    let result = Product::search(&client, &SearchFilter::new("SENTINEL2_L2A")).await;

    assert_eq!(result.unwrap_err().status_code(), Some(404));

    server.shutdown().await;
}

#[tokio::test]
async fn test_forced_server_error_is_never_an_empty_result() {
    let state = MockState::new()
        .with_product(
            "HDF5",
            Fixtures::probav_s1_product(18, 3, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()),
        )
        .with_forced_status(500);
    let server = MockServer::with_state(state).await;
    let client = CatalogClient::new(server.url()).unwrap();

    let search = Product::search(&client, &SearchFilter::new(S1)).await;
    assert!(matches!(
        search,
        Err(CatalogError::TransportError {
            status_code: 500,
            ..
        })
    ));

    let times = get_times(&client, S1).await;
    assert_eq!(times.unwrap_err().status_code(), Some(500));

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start_empty().await;
    let client = CatalogClient::new(server.url()).unwrap();

    assert!(get_product_types(&client).await.unwrap().is_empty());

    {
        let state = server.state();
        let mut state = state.write().await;
        state.insert_product(
            "HDF5",
            Fixtures::probav_s10_product(0, 0, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()),
        );
    }

    assert_eq!(get_product_types(&client).await.unwrap(), vec![S10]);

    server.shutdown().await;
}
