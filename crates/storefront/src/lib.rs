//! Rocket Shoes Storefront library.
//!
//! This crate provides the cart store, catalog client, storage backends and
//! HTTP routes as a library, allowing them to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
