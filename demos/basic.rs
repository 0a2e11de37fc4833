//! Basic example demonstrating the catalog client.
//!
//! Run with:
//! ```
//! MEP_CATALOG_URL=http://pdfcatalog.vgt.vito.be:8080/develop/catalog/v2/ cargo run --example basic
//! ```

use chrono::NaiveDate;
use mep_catalog::{
    get_product_types, get_times, BoundingBox, CatalogClient, Product, Search, SearchFilter,
};

#[tokio::main]
async fn main() -> mep_catalog::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let client = CatalogClient::from_env()?;
    println!("Using catalog at {}", client.base_url());

    // List the product types the catalog knows about
    println!("\n=== Product types ===");
    let product_types = get_product_types(&client).await?;
    for product_type in product_types.iter().take(10) {
        println!("  {}", product_type);
    }

    // Acquisition times of the 10-day synthesis
    println!("\n=== Acquisitions of PROBAV_L3_S10_TOC_333M ===");
    let times = get_times(&client, "PROBAV_L3_S10_TOC_333M").await?;
    println!("  {} acquisitions", times.len());
    if let (Some(first), Some(last)) = (times.first(), times.last()) {
        println!("  from {} to {}", first, last);
    }

    // Products over Belgium for the first dekad of 2016
    println!("\n=== Products over Belgium, 2016-01-01 to 2016-01-10 ===");
    let filter = SearchFilter::new("PROBAV_L3_S10_TOC_333M")
        .with_format("GEOTIFF")
        .with_date_range(
            NaiveDate::from_ymd_opt(2016, 1, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2016, 1, 10).expect("valid date"),
        )
        .with_bbox(BoundingBox::new(2.5, 6.4, 49.5, 51.5));
    let products = Product::search(&client, &filter).await?;

    for product in &products {
        println!("  {} ({:?})", product, product.timestamp());
        match product.file_for("PROBAV:NDVI") {
            Ok(file) => println!("    NDVI: {}", file),
            Err(e) => println!("    {}", e),
        }
    }

    Ok(())
}
