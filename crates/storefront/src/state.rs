//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::storage::{StorageBackend, StorageError};

/// The cart store as wired up by the storefront.
pub type StorefrontCart = CartStore<CatalogClient, StorageBackend>;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart storage: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the single cart
/// store; handlers receive it through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: StorefrontCart,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Opens the configured storage and loads the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built, storage cannot
    /// be opened, or the persisted cart is corrupt.
    pub async fn new(config: &StorefrontConfig) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let storage = StorageBackend::connect(&config.storage).await?;
        let cart = CartStore::load(catalog, storage).await?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cart }),
        })
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &StorefrontCart {
        &self.inner.cart
    }
}
