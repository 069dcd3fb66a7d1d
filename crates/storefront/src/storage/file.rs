//! File-backed storage backend.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a uniquely named temp
//! file in the same directory that is then persisted over the target, so a
//! crash mid-write leaves the previous snapshot intact and concurrent writers
//! never share a temp file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{KeyValueStore, StorageError};

/// Storage rooted at a data directory, created lazily on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_reads_as_missing_key() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("not-created-yet"));
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_creates_dir_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("data"));

        store.set("cart", "[1]").unwrap();
        store.set("cart", "[2]").unwrap();

        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[2]"));
        let files: Vec<_> = std::fs::read_dir(tmp.path().join("data"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, ["cart.json"]);
    }

    #[test]
    fn test_concurrent_writers_never_lose_a_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..100 {
                        let value = format!("[{writer},{round}]");
                        store.set("cart", &value).unwrap();
                    }
                });
            }
        });

        let last = store.get("cart").unwrap().unwrap();
        let parsed: Vec<u32> = serde_json::from_str(&last).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get(1), Some(&99));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        store.set("wishlist", "[]").unwrap();
        store.remove("wishlist").unwrap();
        store.remove("wishlist").unwrap();
        assert_eq!(store.get("wishlist").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
