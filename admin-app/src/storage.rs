//! JSON-file key-value store for small bits of UI state. Read failures are
//! swallowed and logged; the caller's default wins.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Map<String, Value> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %self.path.display(), "unreadable storage file: {}", e);
                    Map::new()
                }
            },
            // A missing file is the normal first-run case.
            Err(_) => Map::new(),
        }
    }

    fn persist(&self, map: &Map<String, Value>) -> bool {
        let serialized = match serde_json::to_string_pretty(map) {
            Ok(s) => s,
            Err(e) => {
                error!("failed to serialize storage: {}", e);
                return false;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            error!(path = %self.path.display(), "failed to write storage: {}", e);
            return false;
        }
        true
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.load().remove(key) {
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(key, "stored value has the wrong shape: {}", e);
                    default
                }
            },
            None => default,
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                error!(key, "failed to serialize value: {}", e);
                return false;
            }
        };
        let mut map = self.load();
        map.insert(key.to_string(), serialized);
        self.persist(&map)
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut map = self.load();
        map.remove(key);
        self.persist(&map)
    }

    pub fn clear(&self) -> bool {
        self.persist(&Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let store = Storage::new(dir.path().join("state.json"));
        (dir, store)
    }

    #[test]
    fn set_get_round_trip() {
        let (_dir, store) = storage();
        assert!(store.set("page_size", &25u32));
        assert_eq!(store.get("page_size", 10u32), 25);
    }

    #[test]
    fn missing_key_returns_default() {
        let (_dir, store) = storage();
        assert_eq!(store.get("absent", "fallback".to_string()), "fallback");
    }

    #[test]
    fn corrupt_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = Storage::new(path);
        assert_eq!(store.get("key", 7i32), 7);
    }

    #[test]
    fn wrong_shape_returns_default() {
        let (_dir, store) = storage();
        store.set("key", &"text");
        assert_eq!(store.get("key", 3i32), 3);
    }

    #[test]
    fn remove_and_clear() {
        let (_dir, store) = storage();
        store.set("a", &1);
        store.set("b", &2);
        store.remove("a");
        assert_eq!(store.get("a", 0), 0);
        assert_eq!(store.get("b", 0), 2);
        store.clear();
        assert_eq!(store.get("b", 0), 0);
    }
}
