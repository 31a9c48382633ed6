//! JSON-file snapshot storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{SnapshotStorage, StorageError, validate_name};

/// Stores each record as `<dir>/<name>.json`.
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a reader never observes a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, name: &str, record: &serde_json::Value) -> Result<(), StorageError> {
        let path = self.path(name)?;
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(record)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("snapshots"));
        let record = serde_json::json!({ "schemaVersion": 1, "version": 1, "products": [] });

        assert!(storage.load("browsing-history-store").await.unwrap().is_none());

        storage.save("browsing-history-store", &record).await.unwrap();
        assert_eq!(
            storage.load("browsing-history-store").await.unwrap(),
            Some(record)
        );
        assert!(dir.path().join("snapshots/browsing-history-store.json").exists());

        storage.remove("browsing-history-store").await.unwrap();
        storage.remove("browsing-history-store").await.unwrap();
        assert!(storage.load("browsing-history-store").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.load("../outside").await,
            Err(StorageError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("cart-store.json"), b"{not json")
            .await
            .unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.load("cart-store").await,
            Err(StorageError::Serialization(_))
        ));
    }
}
