//! Command implementations.
//!
//! Commands write their results to stdout; diagnostics go through `tracing`.

pub mod assistant;
pub mod cart;
pub mod catalog;
pub mod wishlist;

use std::io::{self, Write};

use thiserror::Error;

use techsphere_core::{CurrencyCode, Product};
use techsphere_storefront::cart::{Notice, NoticeLevel};
use techsphere_storefront::error::AppError;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// Send internal failures to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(e) => e.report(),
            Self::Output(e) => tracing::debug!(error = %e, "Output closed"),
        }
    }
}

/// Display currency for all command output.
pub const CURRENCY: CurrencyCode = CurrencyCode::BRL;

/// One product as a listing row.
pub fn product_row(out: &mut impl Write, product: &Product) -> io::Result<()> {
    let old = product
        .old_price
        .filter(|_| product.is_on_sale())
        .map(|p| format!(" (de {})", p.format(CURRENCY)))
        .unwrap_or_default();
    writeln!(
        out,
        "{:>4}  {:<42} {:>14}{old}  [{} | {} un.]  ★{:.1}",
        product.id,
        product.name,
        product.price.format(CURRENCY),
        product.stock_status().label(),
        product.stock,
        product.rating,
    )
}

/// Print a notice the way a toast would show it.
pub fn print_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    let marker = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    };
    writeln!(out, "{marker} {}", notice.message)
}
