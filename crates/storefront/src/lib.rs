//! TechSphere storefront library.
//!
//! Cart store with stock reconciliation, durable slot storage, catalog access
//! with an embedded fallback, wishlist and chat assistant. Front-ends (the
//! `techsphere` CLI, tests) drive it through [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assistant;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod wishlist;
