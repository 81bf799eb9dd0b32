//! Records returned by the remote catalog API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product details from `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// Available units for a product from `GET /stock/{id}`.
///
/// This is the source of truth for how many units of a product the cart may
/// hold in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

impl StockRecord {
    /// Whether `amount` units can be held without exceeding stock.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        amount <= self.amount
    }
}
