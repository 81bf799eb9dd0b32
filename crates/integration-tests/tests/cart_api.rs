//! Integration tests for the storefront cart routes.
//!
//! Requests go through the real router, cart store and catalog client; the
//! catalog itself is the in-process fake.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use rocket_shoes_integration_tests::FakeCatalog;
use rocket_shoes_storefront::routes::routes;
use rocket_shoes_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app(fake: &FakeCatalog, extra: &[(&str, &str)]) -> Router {
    let mut vars = vec![("CART_STORAGE", "memory")];
    vars.extend_from_slice(extra);
    let state = AppState::new(&fake.storefront_config(&vars)).await.unwrap();
    routes().with_state(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

// =============================================================================
// Health & Snapshot
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fake = FakeCatalog::spawn().await;
    let app = app(&fake, &[]).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_empty_cart() {
    let fake = FakeCatalog::spawn().await;
    let app = app(&fake, &[]).await;

    let (status, body) = send(&app, "GET", "/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["subtotal"], "$0.00");
    assert_eq!(body["item_count"], 0);
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_new_product() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(5, 10);
    fake.add_product(5, "Shoe", 179.9);
    let app = app(&fake, &[]).await;

    let (status, body) = send(&app, "POST", "/cart/add", Some(json!({ "product_id": 5 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["id"], 5);
    assert_eq!(body["items"][0]["title"], "Shoe");
    assert_eq!(body["items"][0]["amount"], 1);
    assert_eq!(body["subtotal"], "$179.90");

    let (_, count) = send(&app, "GET", "/cart/count", None).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_add_until_stock_runs_out() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(1, 2);
    fake.add_product(1, "Tênis", 100.0);
    let app = app(&fake, &[]).await;

    for _ in 0..2 {
        let (status, _) = send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "stock_exceeded");
    assert_eq!(body["message"], "Requested quantity is out of stock");

    let (_, cart) = send(&app, "GET", "/cart", None).await;
    assert_eq!(cart["items"][0]["amount"], 2);
    assert_eq!(cart["total_units"], 2);
}

#[tokio::test]
async fn test_add_with_catalog_offline() {
    let fake = FakeCatalog::spawn().await;
    fake.set_offline(true);
    let app = app(&fake, &[]).await;

    let (status, body) = send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "remote_failure");
    assert_eq!(body["message"], "Failed to add product");
}

// =============================================================================
// Remove
// =============================================================================

#[tokio::test]
async fn test_remove_product() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(1, 5);
    fake.set_stock(2, 5);
    fake.add_product(1, "Tênis 1", 100.0);
    fake.add_product(2, "Tênis 2", 200.0);
    let app = app(&fake, &[]).await;

    send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;
    send(&app, "POST", "/cart/add", Some(json!({ "product_id": 2 }))).await;

    let (status, body) =
        send(&app, "POST", "/cart/remove", Some(json!({ "product_id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["id"], 2);
}

#[tokio::test]
async fn test_remove_missing_product() {
    let fake = FakeCatalog::spawn().await;
    let app = app(&fake, &[]).await;

    let (status, body) =
        send(&app, "POST", "/cart/remove", Some(json!({ "product_id": 7 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Failed to remove product");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_amount() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(1, 5);
    fake.add_product(1, "Tênis", 100.0);
    let app = app(&fake, &[]).await;
    send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;

    // Non-positive amounts are ignored without touching the catalog
    let hits_before = fake.stock_hits();
    let (status, body) = send(
        &app,
        "POST",
        "/cart/update",
        Some(json!({ "product_id": 1, "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["amount"], 1);
    assert_eq!(fake.stock_hits(), hits_before);

    // A valid request grows the line by one unit
    let (status, body) = send(
        &app,
        "POST",
        "/cart/update",
        Some(json!({ "product_id": 1, "amount": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["amount"], 2);

    // Above stock is rejected
    let (status, body) = send(
        &app,
        "POST",
        "/cart/update",
        Some(json!({ "product_id": 1, "amount": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Requested quantity is out of stock");
}

#[tokio::test]
async fn test_update_with_catalog_offline() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(1, 5);
    fake.add_product(1, "Tênis", 100.0);
    let app = app(&fake, &[]).await;
    send(&app, "POST", "/cart/add", Some(json!({ "product_id": 1 }))).await;
    fake.set_offline(true);

    let (status, body) = send(
        &app,
        "POST",
        "/cart/update",
        Some(json!({ "product_id": 1, "amount": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to change product quantity");
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart_with_file_storage() {
    let fake = FakeCatalog::spawn().await;
    fake.set_stock(3, 5);
    fake.add_product(3, "Tênis Adidas", 219.9);
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_str().unwrap();
    let storage = [("CART_STORAGE", "file"), ("CART_STORAGE_DIR", dir_path)];

    let first = app(&fake, &storage).await;
    send(&first, "POST", "/cart/add", Some(json!({ "product_id": 3 }))).await;
    let (_, before) = send(&first, "POST", "/cart/add", Some(json!({ "product_id": 3 }))).await;
    drop(first);

    let second = app(&fake, &storage).await;
    let (status, after) = send(&second, "GET", "/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
    assert_eq!(after["items"][0]["amount"], 2);
}
