//! Product listing, search, stock and product creation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use webshop_client::api::NewProduct;
use webshop_client::{ClientError, NoticeLevel, SearchFilters};
use webshop_core::{Availability, BrandId, CategoryId, Price, ProductId};
use webshop_integration_tests::MockBackend;

#[tokio::test]
async fn test_anonymous_listing_decodes_prices() {
    let backend = MockBackend::start().await;
    let mut client = backend.client();

    let products = client.load_products().await.unwrap();

    let runner = products.iter().find(|p| p.name == "Runner").unwrap();
    assert_eq!(runner.price, Price::from_cents(12_000).unwrap());
    assert_eq!(runner.discounted_price, Price::from_cents(9_000).unwrap());
    assert!(runner.is_discounted());
    assert_eq!(runner.category_name(), "Shoes");
    assert_eq!(runner.brand_name(), "Acme");

    let boot = products.iter().find(|p| p.name == "Boot").unwrap();
    assert!(!boot.in_stock);
    assert!(backend.requests()[0].authorization.is_none());
}

#[tokio::test]
async fn test_search_sends_names_and_skips_unset_filters() {
    let backend = MockBackend::start().await;
    let mut client = backend.client();
    client.login("alice", "secret").await.unwrap();

    let filters = SearchFilters {
        gender: Some(String::new()),
        category_id: Some(CategoryId::new(1)),
        brand_id: Some(BrandId::new(1)),
        price_max: Some(Price::from_cents(10_000).unwrap()),
        availability: Some(Availability::InStock),
        ..SearchFilters::default()
    };
    let found = client.search(&filters).await.unwrap();

    let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Sneaker", "Runner"]);
    assert_eq!(client.view().notice.as_ref().unwrap().text, "Found 2 products");

    let request = backend.requests_to("GET", "/api/products/search").remove(0);
    let pairs = request.query_pairs();
    let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert!(!keys.contains(&"gender"));
    assert!(!keys.contains(&"price_min"));
    assert!(pairs.contains(&("category".to_string(), "Shoes".to_string())));
    assert!(pairs.contains(&("brand".to_string(), "Acme".to_string())));
    assert!(pairs.contains(&("availability".to_string(), "in_stock".to_string())));
}

#[tokio::test]
async fn test_search_with_unknown_category_sends_nothing() {
    let backend = MockBackend::start().await;
    let mut client = backend.client();
    client.load_catalog().await;

    let filters = SearchFilters {
        category_id: Some(CategoryId::new(99)),
        ..SearchFilters::default()
    };
    let err = client.search(&filters).await.unwrap_err();

    assert!(matches!(err, ClientError::UnknownCategory(_)));
    assert!(backend.requests_to("GET", "/api/products/search").is_empty());
    assert!(client.view().search_results.error().is_some());
}

#[tokio::test]
async fn test_search_failure_is_shown_inline() {
    let backend = MockBackend::start().await;
    backend.fail(
        "GET",
        "/api/products/search",
        500,
        serde_json::json!({"error": "Search index unavailable"}),
    );
    let mut client = backend.client();

    client.search(&SearchFilters::default()).await.unwrap_err();

    let notice = client.view().notice.as_ref().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Search failed: Search index unavailable");
}

#[tokio::test]
async fn test_product_stock_reads_quantity_endpoint() {
    let backend = MockBackend::start().await;
    let mut client = backend.client();

    let stock = client.product_stock(ProductId::new(2)).await.unwrap();

    assert_eq!(stock.name, "Cap");
    assert_eq!(stock.current_quantity, 3);
    assert!(stock.in_stock);
    assert!(client.view().product_detail.ready().is_some());

    let err = client.product_stock(ProductId::new(42)).await.unwrap_err();
    assert_eq!(err.user_message(), "Product not found");
    assert_eq!(client.view().product_detail.error(), Some("Product not found"));
}

#[tokio::test]
async fn test_create_product_reloads_listing() {
    let backend = MockBackend::start().await;
    let mut client = backend.client();
    client.login("ava", "secret").await.unwrap();
    backend.clear_requests();

    let created = client
        .create_product(&NewProduct {
            name: "Sandal".to_string(),
            description: "Open toe".to_string(),
            price: Price::from_cents(2_550).unwrap(),
            discount_percentage: Decimal::ZERO,
            gender: "Women".to_string(),
            initial_quantity: 6,
            category_id: CategoryId::new(1),
            brand_id: BrandId::new(2),
        })
        .await
        .unwrap();

    assert_eq!(created.id, ProductId::new(5));
    assert_eq!(created.current_quantity, 6);
    assert_eq!(
        client.view().notice.as_ref().unwrap().text,
        "Product added successfully!"
    );
    assert_eq!(client.view().products.ready().unwrap().len(), 5);

    let post = backend.requests_to("POST", "/api/products").remove(0);
    let body = post.body.as_ref().unwrap();
    assert!(body["price"].is_number());
    assert_eq!(body["category_id"], 1);
    assert_eq!(post.authorization.as_deref(), Some("Bearer token-ava"));
    assert_eq!(backend.requests_to("GET", "/api/products").len(), 1);
}
