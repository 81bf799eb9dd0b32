//! Cart operation failures and their user-facing notifications.

use rocket_shoes_core::{DuplicateItemError, ProductId};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Notification shown when a requested quantity exceeds stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// The cart operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic notification for a failure of this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Failed to add product",
            Self::Remove => "Failed to remove product",
            Self::UpdateAmount => "Failed to change product quantity",
        }
    }
}

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// The resulting amount would exceed available stock.
    #[error("Requested amount {requested} of product {product_id} exceeds stock of {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// The catalog lookup failed.
    #[error("Catalog error: {0}")]
    Remote(#[from] CatalogError),

    /// The new cart could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The in-memory cart disagreed with itself while building the new cart.
    #[error("Inconsistent cart: {0}")]
    Inconsistent(#[from] DuplicateItemError),
}

/// Failure classification for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartErrorKind {
    StockExceeded,
    NotFound,
    RemoteFailure,
    StorageFailure,
    InternalFailure,
}

impl CartError {
    #[must_use]
    pub const fn kind(&self) -> CartErrorKind {
        match self {
            Self::StockExceeded { .. } => CartErrorKind::StockExceeded,
            Self::NotFound(_) => CartErrorKind::NotFound,
            Self::Remote(_) => CartErrorKind::RemoteFailure,
            Self::Storage(_) => CartErrorKind::StorageFailure,
            Self::Inconsistent(_) => CartErrorKind::InternalFailure,
        }
    }

    /// Message to show the shopper when `operation` failed with this error.
    #[must_use]
    pub const fn notification(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::StockExceeded { .. } => OUT_OF_STOCK_MESSAGE,
            Self::NotFound(_) | Self::Remote(_) | Self::Storage(_) | Self::Inconsistent(_) => {
                operation.failure_message()
            }
        }
    }
}
