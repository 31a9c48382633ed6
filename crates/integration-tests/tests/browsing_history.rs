//! Integration tests for the browsing history store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use amazona_core::{HISTORY_CAPACITY, ViewedProduct};
use amazona_integration_tests::FlakyStorage;
use amazona_storefront::BrowsingHistoryStore;
use amazona_storefront::storage::{FileStorage, HISTORY_SNAPSHOT, SnapshotStorage};

async fn ids(store: &BrowsingHistoryStore) -> Vec<String> {
    store
        .products()
        .await
        .into_iter()
        .map(|p| p.id.to_string())
        .collect()
}

#[tokio::test]
async fn test_keeps_ten_most_recent() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrowsingHistoryStore::load(Arc::new(FileStorage::new(dir.path())))
        .await
        .unwrap();

    for id in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"] {
        store.add_item(ViewedProduct::new(id, "Shirts")).await.unwrap();
    }

    let viewed = ids(&store).await;
    assert_eq!(viewed.len(), HISTORY_CAPACITY);
    assert_eq!(
        viewed,
        ["k", "j", "i", "h", "g", "f", "e", "d", "c", "b"]
    );

    // Revisiting moves to the front without growing the list.
    store.add_item(ViewedProduct::new("e", "Shirts")).await.unwrap();
    let viewed = ids(&store).await;
    assert_eq!(viewed.len(), HISTORY_CAPACITY);
    assert_eq!(viewed[0], "e");
    assert_eq!(viewed.iter().filter(|id| *id == "e").count(), 1);

    // Survives a reload.
    let reloaded = BrowsingHistoryStore::load(Arc::new(FileStorage::new(dir.path())))
        .await
        .unwrap();
    assert_eq!(ids(&reloaded).await, viewed);
}

#[tokio::test]
async fn test_snapshot_layout() {
    let storage = FlakyStorage::default();
    let store = BrowsingHistoryStore::load(Arc::new(storage.clone()))
        .await
        .unwrap();
    store
        .add_item(ViewedProduct::new("p1", "Pants"))
        .await
        .unwrap();

    let record = storage.load(HISTORY_SNAPSHOT).await.unwrap().unwrap();
    assert_eq!(
        record,
        serde_json::json!({
            "schemaVersion": 1,
            "version": 1,
            "products": [{ "id": "p1", "category": "Pants" }],
        })
    );
}

#[tokio::test]
async fn test_failed_save_keeps_history() {
    let storage = FlakyStorage::default();
    let store = BrowsingHistoryStore::load(Arc::new(storage.clone()))
        .await
        .unwrap();
    store
        .add_item(ViewedProduct::new("p1", "Pants"))
        .await
        .unwrap();

    storage.fail_saves(true);
    assert!(
        store
            .add_item(ViewedProduct::new("p2", "Pants"))
            .await
            .is_err()
    );
    assert!(store.clear().await.is_err());
    assert_eq!(ids(&store).await, ["p1"]);
}
