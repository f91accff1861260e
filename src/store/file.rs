//! File-backed key/value store.
//!
//! Each key maps to `<base>/<key>.json`. Writes go to a uniquely named temp
//! file in the same directory which is then renamed over the target, so
//! readers never see a half written snapshot and concurrent writers (threads
//! or processes) never share a temp path.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::store::traits::KeyValueStore;

/// Directory of one-file-per-key snapshots.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`. The directory is created lazily
    /// on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create a store and make sure its directory exists.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self::new(base_path);
        fs::create_dir_all(&store.base_path)?;
        debug!(path = %store.base_path.display(), "File store opened");
        Ok(store)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to its file path.
    pub fn resolve_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.resolve_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.resolve_path(key)?;
        fs::create_dir_all(&self.base_path)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.base_path)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = value.len(), "Snapshot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn crud_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("dir"));

        assert!(store.get("agentData").unwrap().is_none());

        store.set("agentData", r#"{"callsign":"Nova"}"#).unwrap();
        assert!(tmp.path().join("nested/dir/agentData.json").exists());
        assert_eq!(
            store.get("agentData").unwrap().as_deref(),
            Some(r#"{"callsign":"Nova"}"#)
        );

        store.set("agentData", "{}").unwrap();
        assert_eq!(store.get("agentData").unwrap().as_deref(), Some("{}"));

        assert!(store.remove("agentData").unwrap());
        assert!(store.get("agentData").unwrap().is_none());
        assert!(!store.remove("agentData").unwrap());
    }

    #[test]
    fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let store = FileStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.base_path(), dir.as_path());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.set("agentData", "{}").unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["agentData.json".to_string()]);
    }

    #[test]
    fn concurrent_writers_never_tear_a_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(tmp.path()));
        let payloads: Vec<String> = (0..4)
            .map(|i| format!(r#"{{"writer":{i},"pad":"{}"}}"#, "x".repeat(64 * 1024)))
            .collect();

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..20 {
                        store.set("agentData", &payload).unwrap();
                        let read = store.get("agentData").unwrap().unwrap();
                        let value: serde_json::Value = serde_json::from_str(&read).unwrap();
                        assert!(value["writer"].is_u64());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let last = store.get("agentData").unwrap().unwrap();
        assert!(payloads.contains(&last));
        let names: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn rejects_path_like_keys() {
        let store = FileStore::new("/tmp/unused");
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(store.resolve_path(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
