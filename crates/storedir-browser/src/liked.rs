//! Liked-store bookmarks and the key-value storage behind them.
//!
//! The set is stored as a JSON array of store ids under [`LIKED_STORES_KEY`].
//! It is read once when [`LikedStores::load`] runs and written in full on
//! every toggle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use storedir_core::StoreId;
use thiserror::Error;

pub const LIKED_STORES_KEY: &str = "likedStores";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt key-value file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("key-value store lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage, the shape of browser `localStorage`.
pub trait KeyValueStore {
    /// Returns the value under `key`, or `None` when it was never set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Arc<K> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Key-value store persisted as one JSON object in a file.
///
/// A missing file reads as empty. Parent directories are created on first
/// write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old contents or the new ones.
    fn write_atomic(&self, contents: &[u8]) -> Result<(), StoreError> {
        let mut tmp_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        std::fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            self.io_error(e)
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Corrupt contents are replaced rather than blocking every later write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "overwriting corrupt key-value file");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let encoded = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Encode {
            key: key.to_owned(),
            source: e,
        })?;
        self.write_atomic(encoded.as_bytes())
    }
}

/// The user's liked stores, kept in insertion order.
#[derive(Debug)]
pub struct LikedStores<K> {
    store: K,
    ids: Vec<StoreId>,
}

impl<K: KeyValueStore> LikedStores<K> {
    /// Reads the persisted set. Unreadable or corrupt data is logged and
    /// treated as an empty set.
    pub fn load(store: K) -> Self {
        let ids = match store.get(LIKED_STORES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<StoreId>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring corrupt liked stores entry");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read liked stores");
                Vec::new()
            }
        };
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        Self { store, ids: deduped }
    }

    #[must_use]
    pub fn contains(&self, id: StoreId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &[StoreId] {
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

    /// Flips membership of `id` and persists the whole set.
    ///
    /// The in-memory set changes even when persisting fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the updated set cannot be written.
    pub fn toggle(&mut self, id: StoreId) -> Result<bool, StoreError> {
        let liked = if let Some(pos) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        };
        self.persist()?;
        Ok(liked)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&self.ids).map_err(|e| StoreError::Encode {
            key: LIKED_STORES_KEY.to_owned(),
            source: e,
        })?;
        self.store.set(LIKED_STORES_KEY, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("storedir-liked-{}-{name}", std::process::id()))
            .join("liked.json")
    }

    #[test]
    fn liked_id_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut liked = LikedStores::load(Arc::clone(&store));
        assert!(liked.toggle(42).unwrap());

        let reloaded = LikedStores::load(Arc::clone(&store));
        assert!(reloaded.contains(42));
    }

    #[test]
    fn unliking_removes_from_persistence() {
        let store = Arc::new(MemoryStore::new());
        let mut liked = LikedStores::load(Arc::clone(&store));
        liked.toggle(7).unwrap();
        liked.toggle(8).unwrap();
        assert!(!liked.toggle(7).unwrap());

        let reloaded = LikedStores::load(Arc::clone(&store));
        assert_eq!(reloaded.ids(), &[8]);
    }

    #[test]
    fn stored_value_is_a_json_array() {
        let store = Arc::new(MemoryStore::new());
        let mut liked = LikedStores::load(Arc::clone(&store));
        liked.toggle(3).unwrap();
        liked.toggle(1).unwrap();
        assert_eq!(
            store.get(LIKED_STORES_KEY).unwrap().as_deref(),
            Some("[3,1]")
        );
    }

    #[test]
    fn corrupt_entry_loads_as_empty() {
        let store = MemoryStore::new();
        store.set(LIKED_STORES_KEY, "{not an array").unwrap();
        let liked = LikedStores::load(store);
        assert!(liked.is_empty());
    }

    #[test]
    fn duplicate_ids_are_collapsed_on_load() {
        let store = MemoryStore::new();
        store.set(LIKED_STORES_KEY, "[5,5,6]").unwrap();
        let liked = LikedStores::load(store);
        assert_eq!(liked.ids(), &[5, 6]);
    }

    #[test]
    fn json_file_store_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let mut liked = LikedStores::load(JsonFileStore::new(&path));
        liked.toggle(11).unwrap();
        liked.toggle(12).unwrap();

        let reloaded = LikedStores::load(JsonFileStore::new(&path));
        assert_eq!(reloaded.ids(), &[11, 12]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn json_file_store_missing_file_reads_as_none() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert!(store.get(LIKED_STORES_KEY).unwrap().is_none());
    }

    #[test]
    fn toggle_recovers_from_a_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{\"likedStores\": \"[1,").unwrap();

        let mut liked = LikedStores::load(JsonFileStore::new(&path));
        assert!(liked.is_empty());
        assert!(liked.toggle(5).unwrap());

        let reloaded = LikedStores::load(JsonFileStore::new(&path));
        assert_eq!(reloaded.ids(), &[5]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn json_file_store_leaves_no_temp_file_behind() {
        let path = temp_path("atomic");
        let _ = std::fs::remove_file(&path);
        let store = JsonFileStore::new(&path);
        store.set(LIKED_STORES_KEY, "[1]").unwrap();
        store.set(LIKED_STORES_KEY, "[1,2]").unwrap();

        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("liked.json")]);
        assert_eq!(store.get(LIKED_STORES_KEY).unwrap().as_deref(), Some("[1,2]"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn json_file_store_keeps_other_keys() {
        let path = temp_path("other-keys");
        let _ = std::fs::remove_file(&path);
        let store = JsonFileStore::new(&path);
        store.set("theme", "dark").unwrap();
        store.set(LIKED_STORES_KEY, "[1]").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
