//! Persisted snapshots for client-side stores.
//!
//! Each store persists one named record, always as a whole-snapshot
//! replacement. Records are JSON objects wrapped in a small envelope:
//!
//! ```text
//! { "schemaVersion": 1, "version": 7, ...store fields }
//! ```
//!
//! `schemaVersion` describes the layout; `version` counts committed
//! mutations of the store.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local, for tests and ephemeral sessions
//! - [`FileStorage`] - one JSON file per record in a directory
//! - [`PgStorage`] - `storefront.snapshot` table, namespaced per shopper

mod file;
mod memory;
mod postgres;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record name of the cart store snapshot.
pub const CART_SNAPSHOT: &str = "cart-store";

/// Record name of the browsing history snapshot.
pub const HISTORY_SNAPSHOT: &str = "browsing-history-store";

/// Current snapshot layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur while loading or saving snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Snapshot was written with an unknown layout.
    #[error("snapshot {name} has unsupported schema version {found}")]
    Version { name: String, found: u32 },

    /// Record names are limited to `[a-z0-9_-]`.
    #[error("invalid snapshot name: {0}")]
    InvalidName(String),
}

/// Key-value storage of raw snapshot records.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Read a record, or `None` if it was never written.
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Replace a record.
    async fn save(&self, name: &str, record: &serde_json::Value) -> Result<(), StorageError>;

    /// Delete a record. Deleting a missing record is not an error.
    async fn remove(&self, name: &str) -> Result<(), StorageError>;
}

/// A store's persisted state plus its envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub schema_version: u32,
    pub version: u64,
    #[serde(flatten)]
    pub state: T,
}

impl<T> Snapshot<T> {
    /// Wrap `state` at the current schema version.
    pub const fn new(version: u64, state: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version,
            state,
        }
    }
}

/// Load and decode a snapshot record.
///
/// # Errors
///
/// Returns `StorageError::Version` if the record has an unknown layout, or
/// the backend/decoding error.
pub async fn load_snapshot<T: DeserializeOwned>(
    storage: &dyn SnapshotStorage,
    name: &str,
) -> Result<Option<Snapshot<T>>, StorageError> {
    let Some(record) = storage.load(name).await? else {
        return Ok(None);
    };

    let found = record
        .get("schemaVersion")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    if found != u64::from(SCHEMA_VERSION) {
        return Err(StorageError::Version {
            name: name.to_string(),
            found: u32::try_from(found).unwrap_or(u32::MAX),
        });
    }

    Ok(Some(serde_json::from_value(record)?))
}

/// Encode and save a snapshot record.
///
/// # Errors
///
/// Returns the backend/encoding error.
pub async fn save_snapshot<T: Serialize + Sync>(
    storage: &dyn SnapshotStorage,
    name: &str,
    snapshot: &Snapshot<T>,
) -> Result<(), StorageError> {
    let record = serde_json::to_value(snapshot)?;
    storage.save(name, &record).await
}

/// Reject names that would escape a directory or table key space.
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use amazona_core::{BrowsingHistory, ViewedProduct};

    #[test]
    fn test_validate_name() {
        assert!(validate_name(CART_SNAPSHOT).is_ok());
        assert!(validate_name(HISTORY_SNAPSHOT).is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../etc/passwd").is_err());
        assert!(validate_name("Cart").is_err());
    }

    #[test]
    fn test_envelope_is_flat() {
        let mut history = BrowsingHistory::default();
        history.record(ViewedProduct::new("p1", "Shoes"));
        let json = serde_json::to_value(Snapshot::new(3, history)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "schemaVersion": 1,
                "version": 3,
                "products": [{ "id": "p1", "category": "Shoes" }]
            })
        );
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_schema() {
        let storage = MemoryStorage::new();
        storage
            .save(
                HISTORY_SNAPSHOT,
                &serde_json::json!({ "schemaVersion": 9, "version": 1, "products": [] }),
            )
            .await
            .unwrap();

        let result = load_snapshot::<BrowsingHistory>(&storage, HISTORY_SNAPSHOT).await;
        assert!(matches!(
            result,
            Err(StorageError::Version { found: 9, .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let storage = MemoryStorage::new();
        let loaded = load_snapshot::<BrowsingHistory>(&storage, CART_SNAPSHOT)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }
}
