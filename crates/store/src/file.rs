//! JSON-file-backed snapshot store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::kv::{KeyValueStore, StoreError};

/// One JSON document per key, stored as `<dir>/<key>.json`.
///
/// The directory is created on first write. A missing file reads as `None`;
/// an unparseable file is a `Decode` error the caller decides how to handle.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        // Keys become file names; keep them boring.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source: err,
                });
            }
        };

        let value = serde_json::from_str(&text).map_err(|err| StoreError::Decode {
            key: key.to_string(),
            source: err,
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::Io {
            key: key.to_string(),
            source: err,
        })?;

        let payload = serde_json::to_string_pretty(&value).map_err(|err| StoreError::Decode {
            key: key.to_string(),
            source: err,
        })?;

        fs::write(&path, payload).map_err(|err| StoreError::Io {
            key: key.to_string(),
            source: err,
        })?;

        tracing::debug!(key, path = %path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.get("stocks").unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let value = json!([{"name": "Rice", "amount": 10}]);
        store.set("stocks", value.clone()).unwrap();
        assert_eq!(store.get("stocks").unwrap(), Some(value));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stocks.json"), "{not json").unwrap();

        let store = JsonFileStore::new(dir.path());
        match store.get("stocks") {
            Err(StoreError::Decode { key, .. }) => assert_eq!(key, "stocks"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn hostile_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(matches!(
            store.get("../etc/passwd"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.set("", json!(null)), Err(StoreError::InvalidKey(_))));
    }
}
