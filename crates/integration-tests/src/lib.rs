//! Integration tests for the TechSphere storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techsphere-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart scenarios persisted through file slots
//! - `storefront_catalog` - Catalog loading, fallback and stock updates
//! - `storefront_assistant` - Assistant replies against a mock Gemini API
//!
//! Every test gets its own [`TestContext`]: a mock HTTP server standing in for
//! both the catalog service and Gemini, and a temporary data directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use mockito::{Server, ServerGuard};
use secrecy::SecretString;
use tempfile::TempDir;
use url::Url;

use techsphere_storefront::cart::DiscountRule;
use techsphere_storefront::config::{AssistantConfig, CatalogConfig, StorefrontConfig};
use techsphere_storefront::state::AppState;

/// Path the mock catalog service serves products on.
pub const CATALOG_PATH: &str = "/api/products";

/// Model name used against the mock Gemini API.
pub const TEST_MODEL: &str = "gemini-test";

/// Per-test environment.
pub struct TestContext {
    pub server: ServerGuard,
    pub data_dir: TempDir,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Start a mock server and point a fresh configuration at it.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let data_dir = TempDir::new().expect("create temp data dir");
        let config = test_config(&server.url(), data_dir.path().to_path_buf());
        Self {
            server,
            data_dir,
            config,
        }
    }

    /// Application state over this context's configuration.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState::new(self.config.clone())
    }

    /// Same context, with the catalog pointed at an address nothing listens on.
    #[must_use]
    pub fn with_unreachable_catalog(mut self) -> Self {
        if let Ok(url) = Url::parse("http://127.0.0.1:9/api/products") {
            self.config.catalog.base_url = url;
        }
        self
    }

    /// Path of the Gemini `generateContent` endpoint on the mock server.
    #[must_use]
    pub fn generate_path() -> String {
        format!("/v1beta/models/{TEST_MODEL}:generateContent")
    }
}

fn test_config(server_url: &str, data_dir: std::path::PathBuf) -> StorefrontConfig {
    let base = Url::parse(server_url).expect("mock server URL");
    StorefrontConfig {
        catalog: CatalogConfig {
            base_url: base.join(CATALOG_PATH).expect("catalog URL"),
            fallback_delay: Duration::from_millis(10),
            cache_ttl: Duration::from_secs(60),
        },
        data_dir,
        discount: DiscountRule::default(),
        assistant: AssistantConfig {
            api_key: Some(SecretString::from("test-key".to_string())),
            model: TEST_MODEL.to_string(),
            api_base: base,
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// JSON array with three catalog products: `"a"` (stock 5, 1000),
/// `"b"` (stock 2, 4200) and `"z"` (stock 0, 300).
#[must_use]
pub fn catalog_json() -> String {
    serde_json::json!([
        {"_id": "a", "name": "Teclado Mecânico", "category": "components", "price": 1000, "rating": 4.2, "reviews": 8, "stock": 5},
        {"_id": "b", "name": "Headset 7.1", "category": "audio", "price": 4200, "rating": 4.6, "reviews": 3, "stock": 2},
        {"_id": "z", "name": "Mouse Pad XL", "category": "gaming", "price": 300, "stock": 0}
    ])
    .to_string()
}
