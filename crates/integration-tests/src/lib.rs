//! Integration tests for Rocket Shoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - HTTP catalog client against a fake catalog API
//! - `cart_api` - Storefront cart routes end to end
//!
//! The fake catalog is an axum server bound to an ephemeral port on
//! localhost; no external services are required.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocket_shoes_storefront::config::{CatalogConfig, StorefrontConfig};
use serde_json::{Value, json};
use url::Url;

/// In-process stand-in for the stock and product API.
pub struct FakeCatalog {
    base_url: Url,
    state: Arc<FakeState>,
    server: tokio::task::JoinHandle<()>,
}

#[derive(Default)]
struct FakeState {
    stock: RwLock<HashMap<i64, i64>>,
    products: RwLock<HashMap<i64, Value>>,
    offline: AtomicBool,
    stock_hits: AtomicUsize,
    product_hits: AtomicUsize,
}

impl FakeCatalog {
    /// Start the fake catalog on an ephemeral port.
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
            server,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration pointing at this catalog.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            timeout: None,
        }
    }

    /// Storefront configuration pointing at this catalog, with extra variables.
    #[must_use]
    pub fn storefront_config(&self, extra: &[(&str, &str)]) -> StorefrontConfig {
        let mut vars: HashMap<String, String> = extra
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        vars.insert("CATALOG_API_URL".to_string(), self.base_url.to_string());
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    pub fn set_stock(&self, id: i64, amount: i64) {
        self.state.stock.write().unwrap().insert(id, amount);
    }

    /// Register a product; `price` is served as a JSON number.
    pub fn add_product(&self, id: i64, title: &str, price: f64) {
        self.state.products.write().unwrap().insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/tenis{id}.jpg"),
            }),
        );
    }

    /// Make every endpoint answer 503.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "catalog offline").into_response()
}

async fn stock(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    if state.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    let amount = state.stock.read().unwrap().get(&id).copied();
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn product(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if state.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    let product = state.products.read().unwrap().get(&id).cloned();
    match product {
        Some(product) => Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}
