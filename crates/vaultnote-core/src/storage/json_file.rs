//! Single-file JSON store.
//!
//! The whole store is one JSON object of string values. Every read goes to
//! disk; every write rewrites the file atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::{Result, VaultError};
use crate::fs::write_atomic;
use crate::storage::traits::KeyValueStore;

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Use `path` as the backing file; it is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| VaultError::Storage("JSON store lock poisoned".to_string()))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            VaultError::Storage(format!(
                "Store file {} is not a JSON object of strings: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(entries)?;
        write_atomic(&self.path, &contents)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock_writes()?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock_writes()?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    /// The backing file's modification time.
    fn last_write(&self) -> Result<Option<DateTime<Utc>>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"));
        assert_eq!(store.get("anything").unwrap(), None);
        assert_eq!(store.last_write().unwrap(), None);
    }

    #[test]
    fn test_last_write_follows_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"));
        store.set("a", "1").unwrap();
        assert!(store.last_write().unwrap().is_some());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "{\"nested\":true}").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(
            reopened.get("b").unwrap().as_deref(),
            Some("{\"nested\":true}")
        );

        reopened.remove("a").unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(matches!(store.get("a"), Err(VaultError::Storage(_))));
        // writes refuse to clobber a file they cannot parse
        assert!(store.set("a", "1").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }
}
