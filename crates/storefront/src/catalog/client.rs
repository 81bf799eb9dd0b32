//! HTTP client for the catalog API.
//!
//! Uses `reqwest` for HTTP and caches product details using `moka`
//! (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rocket_shoes_core::{Product, ProductId, StockRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Client for the stock and product API.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    products: Cache<ProductId, Product>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: builder.build()?,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                products,
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(path))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Get the live stock record for a product. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the product has no stock record or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }

    /// Get product details.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }

    /// Drop all cached product details.
    pub fn invalidate_products(&self) {
        self.inner.products.invalidate_all();
    }
}

impl Catalog for CatalogClient {
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        self.get_stock(id).await
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_product(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let c = client("http://localhost:3333/");
        assert_eq!(c.base_url(), "http://localhost:3333");
        assert_eq!(c.endpoint("stock/1"), "http://localhost:3333/stock/1");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://api.example.com/v1");
        assert_eq!(
            c.endpoint("/products/5"),
            "https://api.example.com/v1/products/5"
        );
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_http_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let c = client("http://127.0.0.1:9");
        let err = c.get_stock(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
