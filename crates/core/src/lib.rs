//! Rocket Shoes Core - Shared types library.
//!
//! This crate provides the types shared by every Rocket Shoes component:
//! - `storefront` - Cart store, catalog client and HTTP surface
//! - `cli` - Command-line cart and storage management
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart rules - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
