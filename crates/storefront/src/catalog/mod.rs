//! Catalog access: the remote catalog service with an embedded fallback.
//!
//! # Architecture
//!
//! - [`CatalogClient`] talks to the catalog service and caches reads in `moka`
//! - [`CatalogAccessor`] never fails: when the service is unreachable it waits
//!   the configured delay and serves the embedded dataset instead
//! - [`Catalog`] is an immutable snapshot the cart consults for live stock
//!
//! # Example
//!
//! ```rust,ignore
//! let accessor = CatalogAccessor::new(&config.catalog);
//! let catalog = accessor.load().await;
//!
//! let query = CatalogQuery { category: Some(Category::Audio), ..Default::default() };
//! for product in query.apply(catalog.products()) {
//!     println!("{} ({})", product.name, catalog.source());
//! }
//! ```

mod client;
mod fallback;
mod query;

pub use client::{CatalogClient, CatalogError};
pub use fallback::{fallback_product, fallback_products};
pub use query::{CatalogQuery, SortOrder, UnknownSortOrder};

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use techsphere_core::{Product, ProductId};

use crate::config::CatalogConfig;

/// Source of live stock counts for cart checks.
pub trait StockOracle {
    /// Current available stock for a product, or `None` if it is unknown.
    fn live_stock(&self, id: &ProductId) -> Option<u32>;
}

/// Where a catalog snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// The catalog service.
    Remote,
    /// The embedded dataset.
    Fallback,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only product snapshot, in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    source: CatalogSource,
}

impl Catalog {
    /// Build a snapshot. Products repeating an earlier ID are dropped.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>, source: CatalogSource) -> Self {
        let mut catalog = Self {
            products: Vec::new(),
            index: HashMap::new(),
            source,
        };
        for product in products {
            if catalog.index.contains_key(&product.id) {
                warn!(product_id = %product.id, "Duplicate product in catalog, keeping first");
                continue;
            }
            catalog
                .index
                .insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }
        catalog
    }

    /// Build a snapshot of remote products.
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self::new(products, CatalogSource::Remote)
    }

    /// Snapshot of the embedded dataset.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(fallback_products(), CatalogSource::Fallback)
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&idx| self.products.get(idx))
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub const fn source(&self) -> CatalogSource {
        self.source
    }
}

impl StockOracle for Catalog {
    fn live_stock(&self, id: &ProductId) -> Option<u32> {
        self.get(id).map(|p| p.stock)
    }
}

// =============================================================================
// CatalogAccessor
// =============================================================================

/// Two-tier catalog access: remote first, embedded dataset on failure.
#[derive(Clone)]
pub struct CatalogAccessor {
    client: CatalogClient,
    fallback_delay: Duration,
}

impl CatalogAccessor {
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            client: CatalogClient::new(config),
            fallback_delay: config.fallback_delay,
        }
    }

    /// Underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Load the product list.
    ///
    /// On any remote failure this waits the configured fallback delay and
    /// returns the embedded dataset; [`Catalog::source`] tells the two apart.
    /// Never fails.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Catalog {
        match self.client.fetch_products().await {
            Ok(products) => {
                let catalog = Catalog::from_products(products.iter().cloned());
                info!(count = catalog.len(), "Loaded catalog from service");
                catalog
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = %self.client.base_url(),
                    "Catalog service unavailable, serving embedded catalog"
                );
                tokio::time::sleep(self.fallback_delay).await;
                Catalog::fallback()
            }
        }
    }

    /// Look up a single product.
    ///
    /// A non-success answer from the service yields `None`; a transport or
    /// parse failure falls back to the embedded dataset.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        match self.client.fetch_product(id).await {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %e, "Product lookup failed, using embedded catalog");
                fallback_product(id)
            }
        }
    }

    /// Set a product's stock on the catalog service. Returns whether it was accepted.
    pub async fn update_stock(&self, id: &ProductId, stock: u32) -> bool {
        self.client.update_stock(id, stock).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Instant;

    use mockito::Server;
    use url::Url;

    use super::*;
    use crate::cart::tests::product;

    fn accessor(base_url: &str, delay: Duration) -> CatalogAccessor {
        CatalogAccessor::new(&CatalogConfig {
            base_url: Url::parse(base_url).unwrap(),
            fallback_delay: delay,
            cache_ttl: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_catalog_index_and_order() {
        let catalog = Catalog::from_products(vec![
            product("b", 1, 3),
            product("a", 1, 0),
            product("b", 1, 99),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0].id.as_str(), "b");
        assert_eq!(catalog.live_stock(&ProductId::new("b")), Some(3));
        assert_eq!(catalog.live_stock(&ProductId::new("a")), Some(0));
        assert_eq!(catalog.live_stock(&ProductId::new("z")), None);
    }

    #[test]
    fn test_fallback_catalog() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.source(), CatalogSource::Fallback);
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.live_stock(&ProductId::new("3")), Some(0));
    }

    #[tokio::test]
    async fn test_load_remote() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_body(r#"[{"_id":"x1","name":"Teclado","category":"components","price":399,"stock":2}]"#)
            .create_async()
            .await;

        let catalog = accessor(&format!("{}/api/products", server.url()), Duration::ZERO)
            .load()
            .await;
        assert_eq!(catalog.source(), CatalogSource::Remote);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.live_stock(&ProductId::new("x1")), Some(2));
    }

    #[tokio::test]
    async fn test_load_remote_with_unknown_category() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_body(
                r#"[
                    {"_id":"x1","name":"Teclado","category":"components","price":399,"stock":2},
                    {"_id":"x2","name":"Suporte","category":"accessories","price":89,"stock":7}
                ]"#,
            )
            .create_async()
            .await;

        let catalog = accessor(&format!("{}/api/products", server.url()), Duration::from_secs(5))
            .load()
            .await;
        assert_eq!(catalog.source(), CatalogSource::Remote);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.live_stock(&ProductId::new("x2")), Some(7));
        assert_eq!(catalog.live_stock(&ProductId::new("1")), None);
        assert_eq!(
            catalog.get(&ProductId::new("x2")).unwrap().category,
            techsphere_core::Category::Other
        );
    }

    #[tokio::test]
    async fn test_load_falls_back_after_delay_on_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .with_status(500)
            .create_async()
            .await;

        let delay = Duration::from_millis(50);
        let started = Instant::now();
        let catalog = accessor(&format!("{}/api/products", server.url()), delay)
            .load()
            .await;

        assert!(started.elapsed() >= delay);
        assert_eq!(catalog.source(), CatalogSource::Fallback);
        assert_eq!(catalog.len(), 6);
    }

    #[tokio::test]
    async fn test_product_lookup_not_found_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products/1")
            .with_status(404)
            .create_async()
            .await;

        let found = accessor(&format!("{}/api/products", server.url()), Duration::ZERO)
            .product(&ProductId::new("1"))
            .await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_product_lookup_unreachable_uses_fallback() {
        let found = accessor("http://127.0.0.1:9/api/products", Duration::ZERO)
            .product(&ProductId::new("4"))
            .await
            .unwrap();
        assert_eq!(found.name, "Fone Sony WH-1000XM5 Noise Cancelling");
    }
}
