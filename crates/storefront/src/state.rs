//! Application state shared across front-end commands.

use std::sync::Arc;

use crate::assistant::AssistantClient;
use crate::catalog::CatalogAccessor;
use crate::config::StorefrontConfig;
use crate::storage::FileSlotStore;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configured service clients and the durable slot store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogAccessor,
    assistant: AssistantClient,
    slots: FileSlotStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogAccessor::new(&config.catalog);
        let assistant = AssistantClient::new(&config.assistant);
        let slots = FileSlotStore::new(&config.data_dir);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                assistant,
                slots,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog accessor.
    #[must_use]
    pub fn catalog(&self) -> &CatalogAccessor {
        &self.inner.catalog
    }

    /// Get a reference to the assistant client.
    #[must_use]
    pub fn assistant(&self) -> &AssistantClient {
        &self.inner.assistant
    }

    /// Durable slot store under the configured data directory.
    #[must_use]
    pub fn slots(&self) -> &FileSlotStore {
        &self.inner.slots
    }
}
