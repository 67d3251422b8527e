use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::config::CONFIG;
use crate::error::StoreError;
use crate::filter::FilterOptions;

/// Key-value backend for persisted store snapshots
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set_item(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Versioned snapshot written under `<name>-storage`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    pub state: PersistedBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedBody {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub filters: FilterOptions,
}

pub fn storage_key(store_name: &str) -> String {
    format!("{}-storage", store_name)
}

/// One JSON document per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage rooted at the configured persistence directory
    pub fn from_config() -> Self {
        Self::new(CONFIG.store.persist_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // write-then-rename so readers never see a partial document
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, serde_json::to_vec_pretty(value)?).await?;
        tokio::fs::rename(&staging, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn file_storage_round_trips_documents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("tasks-storage").await.unwrap(), None);

        let doc = json!({"version": 1, "state": {"items": []}});
        storage.set_item("tasks-storage", &doc).await.unwrap();
        assert_eq!(storage.get_item("tasks-storage").await.unwrap(), Some(doc));

        storage.remove_item("tasks-storage").await.unwrap();
        storage.remove_item("tasks-storage").await.unwrap();
        assert_eq!(storage.get_item("tasks-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new("unused");
        let err = storage.get_item("../etc/passwd").await.unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn missing_filters_default_when_parsing_envelope() {
        let state: PersistedState =
            serde_json::from_value(json!({"version": 2, "state": {"items": [{"id": "a"}]}})).unwrap();
        assert_eq!(state.version, 2);
        assert_eq!(state.state.items.len(), 1);
        assert_eq!(state.state.filters, FilterOptions::default());
    }
}
