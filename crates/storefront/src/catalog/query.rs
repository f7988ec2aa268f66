//! Product listing filters and sort orders.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use techsphere_core::{Category, Product};

/// Product listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    /// Highest rated first.
    Rating,
}

impl SortOrder {
    /// Wire name of the sort order.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`SortOrder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

/// Filter and sort applied to a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Only products in this category.
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name. Blank matches all.
    pub search: String,
    pub sort: SortOrder,
}

impl CatalogQuery {
    /// Whether a product passes the category and search filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        let needle = self.search.trim();
        needle.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
    }

    /// Filter and sort `products`. The sort is stable, so ties keep catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut result: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        if self.sort != SortOrder::Default {
            result.sort_by(|a, b| self.sort.compare(a, b));
        }
        result
    }
}
