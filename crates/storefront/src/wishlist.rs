//! Wishlisted product IDs, persisted in their own slot.

use tracing::{debug, error, info, warn};

use techsphere_core::ProductId;

use crate::storage::{SlotStore, StorageError};

/// Name of the durable slot holding the wishlist.
pub const WISHLIST_SLOT: &str = "techsphere_wishlist";

/// Ordered set of wishlisted products.
#[derive(Debug)]
pub struct Wishlist<S> {
    ids: Vec<ProductId>,
    storage: S,
}

impl<S: SlotStore> Wishlist<S> {
    /// Restore the wishlist from `storage`, starting empty if the slot is
    /// missing or unreadable.
    #[must_use]
    pub fn load(storage: S) -> Self {
        let ids = match storage.read(WISHLIST_SLOT) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<ProductId>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Persisted wishlist is unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted wishlist, starting empty");
                Vec::new()
            }
        };

        let mut wishlist = Self {
            ids: Vec::with_capacity(ids.len()),
            storage,
        };
        for id in ids {
            if !wishlist.contains(&id) {
                wishlist.ids.push(id);
            }
        }
        debug!(count = wishlist.ids.len(), "Restored wishlist");
        wishlist
    }

    /// Add or remove a product. Returns `true` if it is now wishlisted.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        let added = if let Some(pos) = self.ids.iter().position(|i| i == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        };

        info!(product_id = %id, added, "Toggled wishlist");
        self.persist();
        added
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    /// Wishlisted IDs in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(StorageError::from)
            .and_then(|encoded| self.storage.write(WISHLIST_SLOT, &encoded));
        if let Err(e) = result {
            error!(slot = WISHLIST_SLOT, error = %e, "Failed to persist wishlist");
        }
    }
}
