//! Stock availability status.

use serde::{Deserialize, Serialize};

/// Stock level at or below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Availability classification derived from a product's stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// No units left.
    OutOfStock,
    /// At most [`LOW_STOCK_THRESHOLD`] units left.
    LowStock,
    InStock,
}

impl StockStatus {
    /// Classify a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            1..=LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }

    /// Whether at least one unit can be sold.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// Short label for listings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Esgotado",
            Self::LowStock => "Últimas unidades",
            Self::InStock => "Em estoque",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stock_boundaries() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(6), StockStatus::InStock);
    }

    #[test]
    fn test_is_available() {
        assert!(!StockStatus::OutOfStock.is_available());
        assert!(StockStatus::LowStock.is_available());
        assert!(StockStatus::InStock.is_available());
    }
}
