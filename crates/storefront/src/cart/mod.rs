//! Stock-aware cart store.
//!
//! [`CartStore`] owns the in-memory cart, validates quantity changes against
//! the catalog, and persists the whole cart on every successful mutation.
//!
//! # Consistency
//!
//! Each operation holds the store lock from the first read until the new
//! cart is visible, so concurrent operations are applied one at a time.
//! The replacement cart is written to storage first and only swapped into
//! memory once the write succeeds; a failed operation leaves both the
//! in-memory and the persisted cart untouched.

mod error;

use rocket_shoes_core::{Cart, CartItem, ProductId};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::storage::{CART_STORAGE_KEY, CartStorage, StorageError};

pub use error::{CartError, CartErrorKind, CartOperation, OUT_OF_STOCK_MESSAGE};

/// Result of a cart operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    /// The cart changed and was persisted; holds the new cart.
    Applied(Cart),
    /// Nothing to do; cart and storage untouched.
    Unchanged,
}

/// Input for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Cart state shared by every consumer of the storefront.
pub struct CartStore<C, S> {
    catalog: C,
    storage: S,
    cart: Mutex<Cart>,
}

impl<C: Catalog, S: CartStorage> CartStore<C, S> {
    /// Build the store from the cart persisted in `storage`, or an empty
    /// cart if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the stored cart is corrupt.
    pub async fn load(catalog: C, storage: S) -> Result<Self, StorageError> {
        let cart = match storage.get(CART_STORAGE_KEY).await? {
            Some(raw) => serde_json::from_str::<Cart>(&raw)?,
            None => Cart::new(),
        };

        info!(items = cart.len(), units = cart.total_units(), "Cart loaded");

        Ok(Self {
            catalog,
            storage,
            cart: Mutex::new(cart),
        })
    }

    /// Copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line if the cart already holds fewer units
    /// than are in stock. A product not yet in the cart is appended with a
    /// single unit; its stock count is fetched but not compared, so an item
    /// whose stock is 0 is still appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if stock cannot cover one more unit of
    ///   an existing line
    /// - [`CartError::Remote`] if the stock or product lookup fails
    /// - [`CartError::Inconsistent`] if the cart already holds the new line
    /// - [`CartError::Storage`] if the new cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<CartUpdate, CartError> {
        let result = self.try_add_product(product_id).await;
        log_outcome(CartOperation::Add, &result);
        result
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<CartUpdate, CartError> {
        let mut cart = self.cart.lock().await;
        let stock = self.catalog.stock(product_id).await?;

        let next = if let Some(existing) = cart.get(product_id) {
            if !stock.covers(existing.amount.saturating_add(1)) {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested: u64::from(existing.amount) + 1,
                    available: stock.amount,
                });
            }
            cart.with_incremented(product_id)
        } else {
            let product = self.catalog.product(product_id).await?;
            Some(cart.with_appended(CartItem::new(product))?)
        };

        match next {
            Some(next) => self.commit(&mut cart, next).await,
            None => Ok(CartUpdate::Unchanged),
        }
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::Storage`] if the new cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<CartUpdate, CartError> {
        let result = self.try_remove_product(product_id).await;
        log_outcome(CartOperation::Remove, &result);
        result
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<CartUpdate, CartError> {
        let mut cart = self.cart.lock().await;
        let next = cart
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        self.commit(&mut cart, next).await
    }

    /// Request a new amount for a product already in the cart.
    ///
    /// `amount` is checked against stock, but the line grows by exactly one
    /// unit rather than being set to `amount`. A line already at the stock
    /// count therefore still grows past it. Amounts of zero or less and
    /// products not in the cart are ignored.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if `amount` is above the stock count
    /// - [`CartError::Remote`] if the stock lookup fails
    /// - [`CartError::Storage`] if the new cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<CartUpdate, CartError> {
        let result = self.try_update_product_amount(request).await;
        log_outcome(CartOperation::UpdateAmount, &result);
        result
    }

    async fn try_update_product_amount(
        &self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<CartUpdate, CartError> {
        if amount <= 0 {
            return Ok(CartUpdate::Unchanged);
        }
        let requested = amount.unsigned_abs();

        let mut cart = self.cart.lock().await;
        let stock = self.catalog.stock(product_id).await?;

        if !cart.contains(product_id) {
            return Ok(CartUpdate::Unchanged);
        }
        if !u32::try_from(requested).is_ok_and(|requested| stock.covers(requested)) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        match cart.with_incremented(product_id) {
            Some(next) => self.commit(&mut cart, next).await,
            None => Ok(CartUpdate::Unchanged),
        }
    }

    /// Persist `next`, then make it the current cart.
    async fn commit(&self, current: &mut Cart, next: Cart) -> Result<CartUpdate, CartError> {
        let raw = serde_json::to_string(&next).map_err(StorageError::from)?;
        self.storage.set(CART_STORAGE_KEY, &raw).await?;
        current.clone_from(&next);
        Ok(CartUpdate::Applied(next))
    }
}

fn log_outcome(operation: CartOperation, result: &Result<CartUpdate, CartError>) {
    match result {
        Ok(CartUpdate::Applied(cart)) => {
            info!(?operation, items = cart.len(), units = cart.total_units(), "Cart updated");
        }
        Ok(CartUpdate::Unchanged) => debug!(?operation, "Cart unchanged"),
        Err(e) => match e.kind() {
            CartErrorKind::StockExceeded | CartErrorKind::NotFound => {
                warn!(?operation, error = %e, notification = e.notification(operation), "Cart operation rejected");
            }
            CartErrorKind::RemoteFailure
            | CartErrorKind::StorageFailure
            | CartErrorKind::InternalFailure => {
                tracing::error!(?operation, error = %e, "Cart operation failed");
            }
        },
    }
}
