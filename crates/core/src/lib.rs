//! TechSphere Core - Shared domain types.
//!
//! This crate provides the types used across all TechSphere components:
//! - `storefront` - Cart store, catalog accessor, wishlist and chat assistant
//! - `cli` - Command-line front-end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, catalog records and stock status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
