//! Remote stock and product lookups.
//!
//! # Architecture
//!
//! - The catalog API is the source of truth for stock - no local copy
//! - Product details are cached in memory via `moka` (5 minute TTL)
//! - Stock is never cached; every cart mutation sees the live count
//!
//! # API
//!
//! ```text
//! GET /stock/{id}     -> { "id": 1, "amount": 3 }
//! GET /products/{id}  -> { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! ```

mod client;

use std::future::Future;

use rocket_shoes_core::{Product, ProductId, StockRecord};
use thiserror::Error;

pub use client::CatalogClient;

/// Errors that can occur when calling the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog has no record for this resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Source of stock counts and product details.
///
/// [`CatalogClient`] is the HTTP implementation; tests substitute in-memory
/// fakes.
pub trait Catalog: Send + Sync {
    /// Current stock for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<StockRecord, CatalogError>> + Send;

    /// Product details used to build a new cart line.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("/stock/7".to_string());
        assert_eq!(err.to_string(), "Not found: /stock/7");

        let err = CatalogError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 503: maintenance");
    }
}
