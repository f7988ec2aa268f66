//! Catalog product records.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::status::StockStatus;

/// A product as served by the catalog service.
///
/// Field names follow the catalog's JSON: the primary key is `_id`, and the
/// optional friendly ID is `id` (exposed here as [`Product::handle`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Primary key assigned by the catalog service.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Optional human-friendly ID.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub name: String,
    pub category: Category,
    /// Current unit price.
    pub price: Price,
    /// Previous price, shown struck through while on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub description: String,
    /// Units available for sale.
    pub stock: u32,
}

impl Product {
    /// Stock level classification for this product.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Whether the product is currently marked down.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.old_price.is_some_and(|old| old > self.price)
    }
}

/// Promotional badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    New,
    Sale,
}

/// Product category.
///
/// Unrecognized slugs deserialize as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Notebooks,
    Smartphones,
    Gaming,
    Audio,
    TvMonitors,
    Components,
    Other,
}

impl Category {
    /// Menu categories in order. [`Category::Other`] is not a menu entry.
    pub const ALL: [Self; 6] = [
        Self::Notebooks,
        Self::Smartphones,
        Self::Gaming,
        Self::Audio,
        Self::TvMonitors,
        Self::Components,
    ];

    /// Wire identifier (matches the serde representation).
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Notebooks => "notebooks",
            Self::Smartphones => "smartphones",
            Self::Gaming => "gaming",
            Self::Audio => "audio",
            Self::TvMonitors => "tv_monitors",
            Self::Components => "components",
            Self::Other => "other",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Notebooks => "Notebooks",
            Self::Smartphones => "Smartphones",
            Self::Gaming => "Gaming",
            Self::Audio => "Áudio",
            Self::TvMonitors => "TVs & Monitores",
            Self::Components => "Componentes",
            Self::Other => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when parsing an unknown category slug.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slug = String::deserialize(deserializer)?;
        Ok(slug.parse().unwrap_or(Self::Other))
    }
}
