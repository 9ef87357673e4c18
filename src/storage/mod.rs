//! Per-key JSON blob storage for the companion app.
//!
//! Mirrors the browser local storage the UI was built around: each key holds
//! one JSON document, read and rewritten whole. Missing or corrupt blobs are
//! treated as absent and defaults are synthesized by the caller, never a hard
//! failure. There is no versioning field, so format changes are
//! backward-incompatible by construction.
//!
//! Single-writer assumption: one engine process owns the data directory. No
//! locking is performed.

pub mod keys;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Typed read. Absent and unparseable blobs both come back as `None`;
    /// a corrupt blob is logged and left on disk until the next `set`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.blob_path(key);
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("ignoring corrupt blob '{}': {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.blob_path(key), content)?;
        Ok(())
    }

    /// Untyped read for opaque UI blobs (e.g. `floating-actions-config`).
    pub fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key)
    }

    pub fn set_raw(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.set(key, value)
    }

    pub fn remove(&self, key: &str) -> bool {
        fs::remove_file(self.blob_path(key)).is_ok()
    }

    /// The app's "reset" action: drop every stored blob. Callers re-synthesize
    /// defaults lazily on the next read.
    pub fn reset(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_get_set_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let sample = Sample {
            name: "fajr".to_string(),
            count: 3,
        };
        storage.set("sample", &sample).unwrap();

        let loaded: Sample = storage.get("sample").unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_absent_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        let loaded: Option<Sample> = storage.get("never-written");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_blob_is_none() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let loaded: Option<Sample> = storage.get("broken");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_overwrite_replaces_whole_blob() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        storage
            .set(
                "sample",
                &Sample {
                    name: "old".to_string(),
                    count: 1,
                },
            )
            .unwrap();
        storage
            .set(
                "sample",
                &Sample {
                    name: "new".to_string(),
                    count: 2,
                },
            )
            .unwrap();

        let loaded: Sample = storage.get("sample").unwrap();
        assert_eq!(loaded.name, "new");
        assert_eq!(loaded.count, 2);
    }

    #[test]
    fn test_reset_removes_all_blobs() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        storage.set("a", &serde_json::json!({"x": 1})).unwrap();
        storage.set("b", &serde_json::json!({"y": 2})).unwrap();

        let removed = storage.reset().unwrap();
        assert_eq!(removed, 2);
        assert!(storage.get_raw("a").is_none());
        assert!(storage.get_raw("b").is_none());
    }

    #[test]
    fn test_remove_single_key() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf()).unwrap();

        storage.set("a", &serde_json::json!({"x": 1})).unwrap();
        assert!(storage.remove("a"));
        assert!(!storage.remove("a"));
    }
}
