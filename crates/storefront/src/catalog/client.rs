//! HTTP client for the remote catalog service.
//!
//! Product reads are cached in `moka` for the configured TTL. Stock updates
//! invalidate the cached entries they affect.

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

use techsphere_core::{Product, ProductId};

use crate::config::CatalogConfig;

const PRODUCTS_KEY: &str = "products";

/// Errors talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("catalog service returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL cannot carry path segments.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
}

#[derive(Serialize)]
struct StockUpdate {
    stock: u32,
}

/// Client for the remote catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Product listing endpoint.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn product_url(&self, id: &ProductId, suffix: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?;
            segments.pop_if_empty().push(id.as_str());
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self
            .inner
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or a
    /// malformed body.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<Vec<Product>> =
            Arc::new(self.get_json(self.inner.base_url.clone()).await?);
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(
                PRODUCTS_KEY.to_string(),
                CacheValue::Products(Arc::clone(&products)),
            )
            .await;

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// Returns `Ok(None)` when the service answers with a non-success status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a malformed body.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let product: Product = match self.get_json(self.product_url(id, None)?).await {
            Ok(product) => product,
            Err(CatalogError::Status(status)) => {
                debug!(status, "Product lookup returned no product");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// Set a product's stock on the catalog service.
    ///
    /// Returns whether the service accepted the update. Failures are logged,
    /// never propagated.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_stock(&self, id: &ProductId, stock: u32) -> bool {
        let result = async {
            let url = self.product_url(id, Some("stock"))?;
            let response = self
                .inner
                .client
                .patch(url)
                .json(&StockUpdate { stock })
                .send()
                .await?;
            Ok::<_, CatalogError>(response.status())
        }
        .await;

        match result {
            Ok(status) if status.is_success() => {
                self.inner.cache.invalidate(PRODUCTS_KEY).await;
                self.inner.cache.invalidate(&format!("product:{id}")).await;
                debug!(stock, "Stock updated");
                true
            }
            Ok(status) => {
                warn!(status = status.as_u16(), "Catalog service rejected stock update");
                false
            }
            Err(e) => {
                error!(error = %e, "Stock update failed");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use mockito::{Matcher, Server};

    use super::*;

    const PRODUCTS_JSON: &str = r#"[
        {"_id":"1","id":"1","name":"Notebook","category":"notebooks","price":12499,"oldPrice":14999,"rating":4.5,"reviews":24,"image":"","badge":"new","description":"","stock":5},
        {"_id":"a9f","name":"Fone","category":"audio","price":"2199.90","stock":0}
    ]"#;

    fn client_for(server: &Server) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(&format!("{}/api/products", server.url())).unwrap(),
            fallback_delay: Duration::ZERO,
            cache_ttl: Duration::from_secs(60),
        })
    }

    #[tokio::test]
    async fn test_fetch_products_parses_and_caches() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PRODUCTS_JSON)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.fetch_products().await.unwrap();
        let second = client.fetch_products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[1].id.as_str(), "a9f");
        assert_eq!(first[1].stock, 0);
        assert!(Arc::ptr_eq(&first, &second));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_products_status_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server).fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(500)));
    }

    #[tokio::test]
    async fn test_fetch_products_malformed_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_body(r#"{"products": "nope"}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_product_not_found_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products/missing")
            .with_status(404)
            .create_async()
            .await;

        let product = client_for(&server)
            .fetch_product(&ProductId::new("missing"))
            .await
            .unwrap();
        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_fetch_product() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products/4")
            .with_status(200)
            .with_body(r#"{"_id":"4","name":"Fone","category":"audio","price":2199,"stock":15}"#)
            .create_async()
            .await;

        let product = client_for(&server)
            .fetch_product(&ProductId::new("4"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.name, "Fone");
        assert_eq!(product.stock, 15);
    }

    #[tokio::test]
    async fn test_update_stock_sends_patch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/products/2/stock")
            .match_body(Matcher::Json(serde_json::json!({ "stock": 7 })))
            .with_status(200)
            .create_async()
            .await;

        assert!(client_for(&server).update_stock(&ProductId::new("2"), 7).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_stock_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/api/products/2/stock")
            .with_status(422)
            .create_async()
            .await;

        assert!(!client_for(&server).update_stock(&ProductId::new("2"), 7).await);
    }

    #[tokio::test]
    async fn test_update_stock_invalidates_list_cache() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_body(PRODUCTS_JSON)
            .expect(2)
            .create_async()
            .await;
        server
            .mock("PATCH", "/api/products/1/stock")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client.fetch_products().await.unwrap();
        assert!(client.update_stock(&ProductId::new("1"), 4).await);
        client.fetch_products().await.unwrap();
        list.assert_async().await;
    }

    #[test]
    fn test_product_url_handles_trailing_slash() {
        let client = CatalogClient::new(&CatalogConfig {
            base_url: Url::parse("http://localhost:5000/api/products/").unwrap(),
            fallback_delay: Duration::ZERO,
            cache_ttl: Duration::from_secs(1),
        });
        let url = client
            .product_url(&ProductId::new("7"), Some("stock"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/products/7/stock");
    }
}
