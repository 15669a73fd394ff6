use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Local store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed JSON key/value map: the client's stand-in for browser
/// storage. One file holds all keys; every write flushes the whole map.
///
/// Writes are serialized within this process only. Concurrent processes
/// racing on the same file can lose updates; that matches the storage
/// model this replaces and is an accepted risk.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl LocalStore {
    /// Open (or create) the store under `dir`. A corrupt or missing file
    /// is treated as empty.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let path = dir.join("local_store.json");

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt local store");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Read and deserialize a key. A value that no longer deserializes is
    /// treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let entries = self.entries.lock().expect("local store lock poisoned");
        let Some(value) = entries.get(key) else {
            return Ok(None);
        };

        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring corrupt local store value");
                Ok(None)
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("local store lock poisoned");
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.flush(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("local store lock poisoned");
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .expect("local store lock poisoned")
            .contains_key(key)
    }

    fn flush(&self, entries: &HashMap<String, serde_json::Value>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Blob {
        n: i32,
        s: String,
    }

    #[test]
    fn test_put_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let blob = Blob {
            n: 7,
            s: "hello".to_string(),
        };
        store.put("blob", &blob).unwrap();
        assert_eq!(store.get::<Blob>("blob").unwrap(), Some(blob));

        store.remove("blob").unwrap();
        assert_eq!(store.get::<Blob>("blob").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalStore::open(dir.path()).unwrap();
            store.put("k", &42i32).unwrap();
        }
        let store = LocalStore::open(dir.path()).unwrap();
        assert_eq!(store.get::<i32>("k").unwrap(), Some(42));
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("local_store.json"), "{not json").unwrap();

        let store = LocalStore::open(dir.path()).unwrap();
        assert_eq!(store.get::<i32>("k").unwrap(), None);
    }

    #[test]
    fn test_wrong_shape_value_is_absent_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store.put("k", &"a string").unwrap();

        assert_eq!(store.get::<Blob>("k").unwrap(), None);
    }
}
