use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Same budget browsers give `localStorage`.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage file {path} is not a string map: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage is disabled")]
    Disabled,
}

impl StorageError {
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// A string key-value store shaped like web `Storage`.
pub trait StorageBackend {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the write would exceed the quota or the
    /// underlying medium rejects it.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying medium rejects the write.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bytes a map occupies for quota purposes (keys plus values).
fn map_size(items: &BTreeMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn size_after_set(items: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    let current = map_size(items);
    let replaced = items.get(key).map_or(0, |old| key.len() + old.len());
    current - replaced + key.len() + value.len()
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    quota: usize,
    disabled: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    pub const fn with_quota(quota: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota,
            disabled: false,
        }
    }

    /// A store that rejects every write, like a sandboxed browser profile.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::new()
        }
    }

    /// Insert directly, bypassing the quota (test fixtures).
    pub fn seed(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        let needed = size_after_set(&self.items, key, value);
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        self.items.remove(key);
        Ok(())
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Storage backed by a JSON object on disk.
///
/// The whole map is held in memory and rewritten on every mutation
/// (temp file + rename, so a crash never leaves a half-written file).
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
    quota: usize,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file is an empty store; the file and its parent
    /// directory are created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or does not
    /// contain a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Self::open_with_quota(path, DEFAULT_QUOTA_BYTES)
    }

    /// Like [`FileStorage::open`] with an explicit byte quota.
    ///
    /// # Errors
    ///
    /// See [`FileStorage::open`].
    pub fn open_with_quota(path: impl Into<PathBuf>, quota: usize) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                StorageError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = items.len(), "opened storage file");
        Ok(Self { path, items, quota })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(items)
            .map_err(|err| io_err(io::Error::other(err)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = size_after_set(&self.items, key, value);
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        let mut next = self.items.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.items = next;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        let mut next = self.items.clone();
        next.remove(key);
        self.flush(&next)?;
        self.items = next;
        Ok(())
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a"), Some("1".to_string()));
        assert_eq!(storage.len(), 1);
        storage.remove_item("a").unwrap();
        assert_eq!(storage.get_item("a"), None);
    }

    #[test]
    fn test_memory_storage_quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap();
        // Replacing keeps the total at 10 bytes, so it still fits.
        storage.set_item("k", "987654321").unwrap();
        let err = storage.set_item("k", "0123456789").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(storage.get_item("k"), Some("987654321".to_string()));
    }

    #[test]
    fn test_disabled_memory_storage_rejects_writes() {
        let mut storage = MemoryStorage::disabled();
        assert!(matches!(
            storage.set_item("a", "b"),
            Err(StorageError::Disabled)
        ));
        assert!(storage.remove_item("a").is_err());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        assert!(storage.is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_writes_through_and_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage.set_item("markdown-text", "# Title\n").unwrap();
        }
        assert!(path.exists());
        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(
            storage.get_item("markdown-text"),
            Some("# Title\n".to_string())
        );
    }

    #[test]
    fn test_file_storage_rejects_non_map_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = FileStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_file_storage_quota_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = FileStorage::open_with_quota(&path, 8).unwrap();
        storage.set_item("a", "1").unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = storage.set_item("b", "way too long").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(storage.get_item("b"), None);
    }

    #[test]
    fn test_file_storage_remove_missing_key_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = FileStorage::open(&path).unwrap();
        storage.remove_item("nope").unwrap();
        assert!(!path.exists());
    }
}
