//! Cart line items and the cart collection.
//!
//! The cart is an ordered list of line items, unique by product ID. All
//! mutations are non-destructive: each returns a new [`Cart`] so callers can
//! persist the replacement before making it visible.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::Product;
use super::id::ProductId;
use super::price::Price;

/// A cart already holds a line for this product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart already contains product {0}")]
pub struct DuplicateItemError(pub ProductId);

/// A product plus the quantity of it currently in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    /// Units held; always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Start a new line for `product` holding a single unit.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Unit price times amount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.amount
    }
}

/// Ordered collection of cart items.
///
/// Serializes as a bare JSON array of [`CartItem`]. Deserialization rejects
/// arrays that contain the same product twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Copy of this cart with one more unit of `id`.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn with_incremented(&self, id: ProductId) -> Option<Self> {
        let current = self.get(id)?.amount;
        Some(self.with_amount(id, current.saturating_add(1)))
    }

    /// Copy of this cart with a new line appended.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateItemError`] if a line for the same product exists.
    pub fn with_appended(&self, item: CartItem) -> Result<Self, DuplicateItemError> {
        if self.contains(item.id) {
            return Err(DuplicateItemError(item.id));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// Copy of this cart without the line for `id`.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    CartItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = DuplicateItemError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        items
            .into_iter()
            .try_fold(Self::new(), |mut cart, item| {
                if cart.contains(item.id) {
                    return Err(DuplicateItemError(item.id));
                }
                cart.items.push(item);
                Ok(cart)
            })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
