//! Transient user-facing notices for cart outcomes.

use std::time::Duration;

use serde::Serialize;

use techsphere_core::Product;

use super::CartError;
use crate::error::add_breadcrumb;

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short, auto-dismissing message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip)]
    pub dismiss_after: Duration,
}

impl Notice {
    fn new(level: NoticeLevel, message: String) -> Self {
        let notice = Self {
            level,
            message,
            dismiss_after: NOTICE_TTL,
        };
        notice.record();
        notice
    }

    /// Confirmation that `quantity` units of `product` were added.
    #[must_use]
    pub fn added(product: &Product, quantity: u32) -> Self {
        Self::new(
            NoticeLevel::Success,
            format!("{quantity}x {} no carrinho!", product.name),
        )
    }

    /// Feedback for a rejected cart mutation.
    #[must_use]
    pub fn from_cart_error(err: &CartError) -> Self {
        let message = match err {
            CartError::OutOfStock { .. } => "Produto esgotado.",
            CartError::InsufficientStock { .. } => "Estoque insuficiente.",
            CartError::StockLimitReached { .. } => "Limite de estoque atingido.",
            CartError::InvalidQuantity => "Quantidade inválida.",
        };
        Self::new(NoticeLevel::Error, message.to_string())
    }

    /// Whether the notice should be dismissed after `elapsed` on screen.
    #[must_use]
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        elapsed >= self.dismiss_after
    }

    fn record(&self) {
        let level = match self.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        };
        add_breadcrumb("cart", &self.message, Some(&[("level", level)]));
    }
}
