//! Cart serialization to and from its durable slot.
//!
//! The slot holds a JSON envelope:
//!
//! ```json
//! { "version": 1, "savedAt": "2026-10-16T12:00:00Z", "lines": [ { "_id": "1", ..., "quantity": 2 } ] }
//! ```
//!
//! Each line is the product record with `quantity` and `addedAt` alongside.
//! A bare array of such lines (the format written by earlier front-ends) is
//! also accepted on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::{Cart, CartLine};
use crate::storage::SlotStore;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCartRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    lines: &'a [CartLine],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    version: u32,
    lines: Vec<CartLine>,
}

/// Errors decoding a persisted cart.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported cart format version {0}")]
    UnsupportedVersion(u32),
}

/// Serialize a cart for its durable slot.
///
/// # Errors
///
/// Returns an error if a line cannot be serialized.
pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedCartRef {
        version: FORMAT_VERSION,
        saved_at: Utc::now(),
        lines: cart.lines(),
    })
}

/// Deserialize a cart from its durable slot contents.
///
/// Line invariants are re-applied: zero-quantity lines and repeated products
/// are dropped.
///
/// # Errors
///
/// Returns an error if the contents are not a recognized cart format.
pub fn decode_cart(raw: &str) -> Result<Cart, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;

    let lines = if value.is_array() {
        debug!("Restoring cart from legacy array format");
        serde_json::from_value::<Vec<CartLine>>(value)?
    } else {
        let persisted: PersistedCart = serde_json::from_value(value)?;
        if persisted.version > FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(persisted.version));
        }
        persisted.lines
    };

    let (cart, discarded) = Cart::from_lines(lines);
    if discarded > 0 {
        warn!(discarded, "Dropped invalid lines from persisted cart");
    }
    Ok(cart)
}

/// Load the cart from `key`, degrading to an empty cart on any failure.
pub(super) fn load(storage: &impl SlotStore, key: &str) -> Cart {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(slot = key, "No persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(slot = key, error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match decode_cart(&raw) {
        Ok(cart) => {
            debug!(slot = key, lines = cart.len(), "Restored persisted cart");
            cart
        }
        Err(e) => {
            warn!(slot = key, error = %e, "Persisted cart is unreadable, starting empty");
            Cart::new()
        }
    }
}

/// Write the cart to `key`. Failures are logged, never propagated.
///
/// Returns whether the write succeeded.
pub(super) fn save(storage: &impl SlotStore, key: &str, cart: &Cart) -> bool {
    let result = encode_cart(cart)
        .map_err(crate::storage::StorageError::from)
        .and_then(|encoded| storage.write(key, &encoded));

    match result {
        Ok(()) => true,
        Err(e) => {
            error!(slot = key, error = %e, "Failed to persist cart");
            false
        }
    }
}

/// Delete the cart slot. Failures are logged, never propagated.
pub(super) fn discard(storage: &impl SlotStore, key: &str) {
    if let Err(e) = storage.remove(key) {
        error!(slot = key, error = %e, "Failed to delete persisted cart");
    }
}
