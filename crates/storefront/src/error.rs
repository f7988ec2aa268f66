//! Unified error handling with Sentry integration.
//!
//! Library operations degrade instead of failing wherever the storefront can
//! keep going (catalog fallback, assistant apology, in-memory cart). `AppError`
//! is what remains: failures a front-end has to show or abort on.

use thiserror::Error;

use crate::assistant::AssistantError;
use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog service operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable slot operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Assistant request failed.
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Cart mutation rejected by a stock check.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a fault of the system rather than the user.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Storage(_) | Self::Internal(_) | Self::Catalog(_)
        )
    }

    /// Capture internal errors to Sentry. User-facing conditions only log.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "2x Fone no carrinho!", Some(&[("product_id", "4")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
