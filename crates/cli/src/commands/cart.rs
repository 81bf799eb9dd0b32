//! Cart commands.
//!
//! Uses the same configuration as the storefront binary, so the CLI and the
//! server see the same persisted cart.
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Base URL of the stock and product API
//! - `CART_STORAGE`, `CART_STORAGE_DIR`, `CART_DATABASE_URL` - see storefront config

use std::fmt::Write as _;

use rocket_shoes_core::{Cart, ProductId};
use rocket_shoes_storefront::cart::{
    CartError, CartOperation, CartUpdate, UpdateProductAmount,
};
use rocket_shoes_storefront::config::{ConfigError, StorefrontConfig};
use rocket_shoes_storefront::state::{AppState, StateError};
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage or catalog could not be initialized.
    #[error("Startup error: {0}")]
    Startup(#[from] StateError),

    /// The operation was rejected; the message is the shopper notification.
    #[error("{message} ({source})")]
    Rejected {
        message: &'static str,
        #[source]
        source: CartError,
    },
}

impl CartCommandError {
    fn rejected(operation: CartOperation, source: CartError) -> Self {
        Self::Rejected {
            message: source.notification(operation),
            source,
        }
    }
}

async fn open() -> Result<AppState, CartCommandError> {
    let config = StorefrontConfig::from_env()?;
    Ok(AppState::new(&config).await?)
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if configuration or storage cannot be loaded.
pub async fn show() -> Result<(), CartCommandError> {
    let state = open().await?;
    print_cart(&state.cart().snapshot().await);
    Ok(())
}

/// Add one unit of a product and print the cart.
///
/// # Errors
///
/// Returns an error if startup fails or the add is rejected.
pub async fn add(product_id: ProductId) -> Result<(), CartCommandError> {
    let state = open().await?;
    let update = state
        .cart()
        .add_product(product_id)
        .await
        .map_err(|e| CartCommandError::rejected(CartOperation::Add, e))?;
    report(&state, update).await;
    Ok(())
}

/// Remove a product and print the cart.
///
/// # Errors
///
/// Returns an error if startup fails or the product is not in the cart.
pub async fn remove(product_id: ProductId) -> Result<(), CartCommandError> {
    let state = open().await?;
    let update = state
        .cart()
        .remove_product(product_id)
        .await
        .map_err(|e| CartCommandError::rejected(CartOperation::Remove, e))?;
    report(&state, update).await;
    Ok(())
}

/// Request a new amount for a product and print the cart.
///
/// # Errors
///
/// Returns an error if startup fails or the update is rejected.
pub async fn update(product_id: ProductId, amount: i64) -> Result<(), CartCommandError> {
    let state = open().await?;
    let update = state
        .cart()
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await
        .map_err(|e| CartCommandError::rejected(CartOperation::UpdateAmount, e))?;
    report(&state, update).await;
    Ok(())
}

async fn report(state: &AppState, update: CartUpdate) {
    match update {
        CartUpdate::Applied(cart) => print_cart(&cart),
        CartUpdate::Unchanged => {
            tracing::info!("Cart unchanged");
            print_cart(&state.cart().snapshot().await);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    print!("{}", render_cart(cart));
}

/// Render the cart as a plain-text table.
fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<40} {:>6} {:>12} {:>12}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    );
    for item in cart.items() {
        let title: String = item.title.chars().take(40).collect();
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>6} {:>12} {:>12}",
            item.id.as_i64(),
            title,
            item.amount,
            item.price.display(),
            item.subtotal().display()
        );
    }
    let _ = writeln!(
        out,
        "{} product(s), {} unit(s), total {}",
        cart.len(),
        cart.total_units(),
        cart.total().display()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rocket_shoes_core::{CartItem, Price};

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_cart_rows_and_total() {
        let cart = Cart::try_from(vec![CartItem {
            id: ProductId::new(3),
            title: "Tênis Adidas Duramo Lite 2.0".to_string(),
            price: Price::from_cents(21_990),
            image: String::new(),
            amount: 2,
        }])
        .unwrap();

        let out = render_cart(&cart);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Tênis Adidas Duramo Lite 2.0"));
        assert!(lines[1].contains("$219.90"));
        assert!(lines[1].contains("$439.80"));
        assert_eq!(lines[2], "1 product(s), 2 unit(s), total $439.80");
    }

    #[test]
    fn test_rejected_message_is_notification() {
        let err = CartCommandError::rejected(
            CartOperation::Remove,
            CartError::NotFound(ProductId::new(4)),
        );
        assert!(err.to_string().starts_with("Failed to remove product"));
    }
}
