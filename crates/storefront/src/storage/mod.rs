//! Key-value snapshot storage for client-side state.
//!
//! Each store owns one key and writes its whole list there as JSON after every
//! mutation. There is no schema version and no incremental update: the value
//! under a key is always the latest full snapshot.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests and demos
//! - [`FileStore`] - one JSON file per key inside a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string-keyed, string-valued storage slot provider.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// What happened when a store tried to restore its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreState {
    /// Nothing was stored under the key.
    Missing,
    /// A snapshot with this many entries was restored.
    Restored(usize),
    /// A value existed but could not be read; the store started empty.
    Corrupted(String),
}

/// Load the list stored under `key`.
///
/// Never fails: unreadable or malformed snapshots yield an empty list, and the
/// returned [`RestoreState`] tells the caller which case occurred.
pub fn load_list<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> (Vec<T>, RestoreState) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), RestoreState::Missing),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored snapshot, starting empty");
            return (Vec::new(), RestoreState::Corrupted(e.to_string()));
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            let count = items.len();
            (items, RestoreState::Restored(count))
        }
        Err(e) => {
            warn!(key, error = %e, "Stored snapshot is malformed, starting empty");
            (Vec::new(), RestoreState::Corrupted(e.to_string()))
        }
    }
}

/// Serialize `items` and overwrite `key` with the snapshot.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn save_list<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;
    storage.set(key, &json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key() {
        let storage = MemoryStore::new();
        let (items, state) = load_list::<u32>(&storage, "cart");
        assert!(items.is_empty());
        assert_eq!(state, RestoreState::Missing);
    }

    #[test]
    fn test_load_malformed_snapshot_is_reported() {
        let storage = MemoryStore::new();
        storage.set("cart", "{not json").unwrap();

        let (items, state) = load_list::<u32>(&storage, "cart");
        assert!(items.is_empty());
        assert!(matches!(state, RestoreState::Corrupted(_)));
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStore::new();
        save_list(&storage, "numbers", &[1_u32, 2, 3]).unwrap();

        let (items, state) = load_list::<u32>(&storage, "numbers");
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(state, RestoreState::Restored(3));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let storage = MemoryStore::new();
        save_list(&storage, "numbers", &[1_u32, 2, 3]).unwrap();
        save_list::<u32>(&storage, "numbers", &[]).unwrap();

        assert_eq!(storage.get("numbers").unwrap().as_deref(), Some("[]"));
    }
}
