//! Local key-value stores backing the persisted directory snapshot.
//!
//! - [`MemoryStore`]: process memory, with an optional byte quota
//! - [`FileStore`]: one JSON file per key inside a cache directory

use crate::core::backend::LocalStore;
use crate::core::error::{DirectoryError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects any single value larger than `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(DirectoryError::storage_quota_exceeded(key, value.len(), limit));
            }
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let key_hash = format!("{:x}", md5::compute(key.as_bytes()));
        self.root.join(format!("{key_hash}.json"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            log::debug!("No stored value for '{key}' at {}", path.display());
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some).map_err(|e| {
            log::error!("Failed to read '{}': {}", path.display(), e);
            DirectoryError::storage(key, e.to_string())
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Err(e) = fs::create_dir_all(&self.root) {
            log::error!(
                "Failed to create cache directory '{}': {}",
                self.root.display(),
                e
            );
            return Err(DirectoryError::storage(key, e.to_string()));
        }

        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| {
            log::error!("Failed to write '{}': {}", path.display(), e);
            DirectoryError::storage(key, e.to_string())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DirectoryError::storage(key, e.to_string())),
        }
    }
}
