//! Durable key-value slots.
//!
//! A slot is a single named string entry that survives restarts. The cart and
//! the wishlist each own one slot. Encoding is the caller's concern; slots only
//! store text.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

/// Errors raised by a slot backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Slot key cannot be mapped to a storage location.
    #[error("invalid slot key: {0}")]
    InvalidKey(String),

    /// Value could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A durable key-value store holding string slots.
pub trait SlotStore {
    /// Read a slot. Returns `Ok(None)` when the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (e.g. out of space).
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot delete the slot.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileSlotStore
// =============================================================================

/// Slot store keeping one JSON file per key inside a directory.
///
/// Writes go to a temporary file that is synced and then renamed over the
/// slot, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let temp_path = path.with_extension("json.tmp");
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &path)
        });

        if let Err(source) = written {
            if let Err(e) = fs::remove_file(&temp_path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary slot file");
            }
            return Err(io_err(source));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// MemorySlotStore
// =============================================================================

/// In-memory slot store for ephemeral sessions and tests.
///
/// Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no slot has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_store_missing_slot_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(dir.path());
        assert!(store.read("techsphere_cart").unwrap().is_none());
    }

    #[test]
    fn test_file_store_write_read_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(dir.path().join("nested"));

        store.write("techsphere_cart", "[1]").unwrap();
        assert_eq!(store.read("techsphere_cart").unwrap().as_deref(), Some("[1]"));

        store.write("techsphere_cart", "[2]").unwrap();
        assert_eq!(store.read("techsphere_cart").unwrap().as_deref(), Some("[2]"));

        // No temp file is left behind
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_file_store_failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(dir.path());
        let blocked = dir.path().join("techsphere_cart.json");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();

        let err = store.write("techsphere_cart", "[]").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!dir.path().join("techsphere_cart.json.tmp").exists());
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(dir.path());
        store.write("slot", "x").unwrap();
        store.remove("slot").unwrap();
        store.remove("slot").unwrap();
        assert!(store.read("slot").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.read(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_store_clones_share_slots() {
        let store = MemorySlotStore::new();
        let handle = store.clone();
        store.write("a", "1").unwrap();
        assert_eq!(handle.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(handle.len(), 1);
        handle.remove("a").unwrap();
        assert!(store.is_empty());
    }
}
