//! # In-Memory Storage
//!
//! A `KeyValueStorage` backed by a map. Nothing survives the process; use it
//! for tests and for sessions that should not touch disk.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StorageResult;
use crate::kv::KeyValueStorage;

/// Process-local key-value storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Creates a storage pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStorage {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_remove_deletes() {
        let storage = MemoryStorage::with_entry("k", "v1");
        storage.set("k", "v2").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len().await, 1);

        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();
        assert!(storage.is_empty().await);
    }
}
