//! Cart route handlers.
//!
//! Every handler responds with the full cart view on success. Failures carry
//! the shopper-facing notification in the error body (see [`AppError`]).

use axum::{Json, extract::State};
use rocket_shoes_core::{Cart, CartItem, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartOperation, CartUpdate, UpdateProductAmount};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: String,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Number of distinct products.
    pub item_count: usize,
    pub total_units: u64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            image: item.image.clone(),
            amount: item.amount,
            price: item.price.display(),
            subtotal: item.subtotal().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.len(),
            total_units: cart.total_units(),
        }
    }
}

/// Cart badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// Add/remove request body.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Cart view after an operation; unchanged carts are re-read from the store.
async fn view_after(state: &AppState, update: CartUpdate) -> CartView {
    match update {
        CartUpdate::Applied(cart) => CartView::from(&cart),
        CartUpdate::Unchanged => CartView::from(&state.cart().snapshot().await),
    }
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&state.cart().snapshot().await))
}

/// Distinct product count for the header badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.cart().snapshot().await.len(),
    })
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<CartView>> {
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", &product_id)]));

    let update = state
        .cart()
        .add_product(form.product_id)
        .await
        .map_err(|e| AppError::cart(CartOperation::Add, e))?;

    Ok(Json(view_after(&state, update).await))
}

/// Remove a product's line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<CartView>> {
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", &product_id)]));

    let update = state
        .cart()
        .remove_product(form.product_id)
        .await
        .map_err(|e| AppError::cart(CartOperation::Remove, e))?;

    Ok(Json(view_after(&state, update).await))
}

/// Request a new amount for a product.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateProductAmount>,
) -> Result<Json<CartView>> {
    let product_id = request.product_id.to_string();
    let amount = request.amount.to_string();
    add_breadcrumb(
        "cart",
        "Update cart amount",
        Some(&[("product_id", &product_id), ("amount", &amount)]),
    );

    let update = state
        .cart()
        .update_product_amount(request)
        .await
        .map_err(|e| AppError::cart(CartOperation::UpdateAmount, e))?;

    Ok(Json(view_after(&state, update).await))
}
