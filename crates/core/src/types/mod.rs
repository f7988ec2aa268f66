//! Core types for TechSphere.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::ProductId;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{Badge, Category, Product, UnknownCategory};
pub use status::StockStatus;
