//! In-memory snapshot storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SnapshotStorage, StorageError, validate_name};

/// Process-local storage. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>, StorageError> {
        validate_name(name)?;
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn save(&self, name: &str, record: &serde_json::Value) -> Result<(), StorageError> {
        validate_name(name)?;
        self.records
            .write()
            .await
            .insert(name.to_string(), record.clone());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        self.records.write().await.remove(name);
        Ok(())
    }
}
