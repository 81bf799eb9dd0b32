//! In-process storage.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{CartStorage, StorageError};

/// Map-backed storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }
}

impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = MemoryStorage::new();
        storage.set("k", "one").await.unwrap();
        storage.set("k", "two").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));
        assert!(storage.get("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_values() {
        let storage = MemoryStorage::with_value("k", "v");
        let clone = storage.clone();
        clone.set("k", "w").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("w"));
    }
}
