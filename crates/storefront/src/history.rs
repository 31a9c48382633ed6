//! Browsing history store.
//!
//! Same persisted-snapshot lifecycle as the cart store, without any pricing
//! round trip: each change is applied to a copy, persisted, then published.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use amazona_core::{BrowsingHistory, ViewedProduct};

use crate::storage::{
    HISTORY_SNAPSHOT, Snapshot, SnapshotStorage, StorageError, load_snapshot, save_snapshot,
};

/// Persisted most-recently-viewed list for one shopper session.
///
/// Cheaply cloneable; clones share the same history.
#[derive(Clone)]
pub struct BrowsingHistoryStore {
    inner: Arc<BrowsingHistoryInner>,
}

struct BrowsingHistoryInner {
    storage: Arc<dyn SnapshotStorage>,
    state: Mutex<Snapshot<BrowsingHistory>>,
}

impl BrowsingHistoryStore {
    /// Hydrate the store from `storage`, starting empty if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the saved snapshot cannot be read.
    #[instrument(skip_all)]
    pub async fn load(storage: Arc<dyn SnapshotStorage>) -> Result<Self, StorageError> {
        let state = load_snapshot::<BrowsingHistory>(storage.as_ref(), HISTORY_SNAPSHOT)
            .await?
            .unwrap_or_else(|| Snapshot::new(0, BrowsingHistory::default()));

        Ok(Self {
            inner: Arc::new(BrowsingHistoryInner {
                storage,
                state: Mutex::new(state),
            }),
        })
    }

    /// Viewed products, most recent first.
    pub async fn products(&self) -> Vec<ViewedProduct> {
        self.inner.state.lock().await.state.products.clone()
    }

    /// Record a product view.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the new history could not be persisted; the
    /// previous history is kept in that case.
    #[instrument(skip(self), fields(product_id = %product.id))]
    pub async fn add_item(&self, product: ViewedProduct) -> Result<(), StorageError> {
        self.update(|history| history.record(product)).await
    }

    /// Forget every viewed product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the empty history could not be persisted.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.update(BrowsingHistory::clear).await
    }

    async fn update(&self, apply: impl FnOnce(&mut BrowsingHistory)) -> Result<(), StorageError> {
        let mut state = self.inner.state.lock().await;

        let mut history = state.state.clone();
        apply(&mut history);
        let next = Snapshot::new(state.version + 1, history);

        save_snapshot(self.inner.storage.as_ref(), HISTORY_SNAPSHOT, &next).await?;
        debug!(
            version = next.version,
            products = next.state.len(),
            "Browsing history committed"
        );
        *state = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_add_persists_and_rehydrates() {
        let storage = MemoryStorage::new();
        let history = BrowsingHistoryStore::load(Arc::new(storage.clone()))
            .await
            .unwrap();
        history
            .add_item(ViewedProduct::new("p1", "Shoes"))
            .await
            .unwrap();
        history
            .add_item(ViewedProduct::new("p2", "Jeans"))
            .await
            .unwrap();

        let reloaded = BrowsingHistoryStore::load(Arc::new(storage)).await.unwrap();
        let ids: Vec<_> = reloaded
            .products()
            .await
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_clear_persists() {
        let storage = MemoryStorage::new();
        let history = BrowsingHistoryStore::load(Arc::new(storage.clone()))
            .await
            .unwrap();
        history
            .add_item(ViewedProduct::new("p1", "Shoes"))
            .await
            .unwrap();
        history.clear().await.unwrap();

        let reloaded = BrowsingHistoryStore::load(Arc::new(storage)).await.unwrap();
        assert!(reloaded.products().await.is_empty());
    }
}
