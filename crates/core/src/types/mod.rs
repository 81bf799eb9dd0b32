//! Core types for Rocket Shoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{Cart, CartItem, DuplicateItemError};
pub use catalog::{Product, StockRecord};
pub use id::*;
pub use price::{Price, PriceError};
