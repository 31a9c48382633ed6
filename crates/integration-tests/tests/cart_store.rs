//! Integration tests for the cart store.
//!
//! Exercises the full mutation cycle (plan, price, persist, publish) against
//! recording and failing collaborators.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use amazona_core::Cart;
use amazona_integration_tests::{FailingResolver, FlakyStorage, RecordingResolver, item};
use amazona_storefront::pricing::{PolicyResolver, PricingError};
use amazona_storefront::storage::{
    CART_SNAPSHOT, FileStorage, MemoryStorage, SnapshotStorage, load_snapshot,
};
use amazona_storefront::{CartError, CartStore};
use rust_decimal_macros::dec;

async fn recording_store() -> (CartStore, Arc<RecordingResolver>) {
    let resolver = Arc::new(RecordingResolver::default());
    let store = CartStore::load(resolver.clone(), Arc::new(MemoryStorage::new()))
        .await
        .unwrap();
    (store, resolver)
}

// ============================================================================
// Add / update / remove
// ============================================================================

#[tokio::test]
async fn test_add_to_empty_cart() {
    let (store, resolver) = recording_store().await;

    store.add_item(&item("p1", 5, dec!(10)), 2).await.unwrap();

    let cart = store.cart().await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);

    let requests = resolver.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items.len(), 1);
    assert_eq!(requests[0].items[0].quantity, 2);
}

#[tokio::test]
async fn test_repeated_adds_merge_up_to_stock() {
    let (store, _) = recording_store().await;
    let shirt = item("p1", 5, dec!(10));

    store.add_item(&shirt, 2).await.unwrap();
    store.add_item(&shirt, 3).await.unwrap();

    let err = store.add_item(&shirt, 1).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 6,
            available: 5,
            ..
        }
    ));

    let cart = store.cart().await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(store.version().await, 2);
}

#[tokio::test]
async fn test_merge_keeps_stored_line_metadata() {
    let (store, _) = recording_store().await;
    let original = item("p1", 5, dec!(10));
    let client_id = store.add_item(&original, 1).await.unwrap();

    let mut renamed = item("p1", 5, dec!(12));
    renamed.name = "Renamed".to_string();
    let merged_id = store.add_item(&renamed, 1).await.unwrap();

    assert_eq!(merged_id, client_id);
    let cart = store.cart().await;
    assert_eq!(cart.items[0].name, original.name);
    assert_eq!(cart.items[0].unit_price, dec!(10));
    assert_eq!(cart.items_price, dec!(20.00));
}

#[tokio::test]
async fn test_variants_are_separate_lines() {
    let (store, _) = recording_store().await;
    let red = item("p1", 5, dec!(10));
    let mut blue = item("p1", 5, dec!(10));
    blue.color = "Blue".to_string();

    store.add_item(&red, 1).await.unwrap();
    store.add_item(&blue, 1).await.unwrap();
    store.add_item(&red, 1).await.unwrap();

    let cart = store.cart().await;
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_update_missing_line_is_noop() {
    let (store, resolver) = recording_store().await;
    store.add_item(&item("p1", 5, dec!(10)), 1).await.unwrap();
    let before = store.cart().await;

    store.update_item(&item("p2", 5, dec!(10)), 3).await.unwrap();

    assert_eq!(store.cart().await, before);
    assert_eq!(store.version().await, 1);
    assert_eq!(resolver.requests().await.len(), 1);
}

#[tokio::test]
async fn test_update_sets_quantity() {
    let (store, resolver) = recording_store().await;
    let shirt = item("p1", 5, dec!(10));
    store.add_item(&shirt, 1).await.unwrap();

    store.update_item(&shirt, 4).await.unwrap();

    let cart = store.cart().await;
    assert_eq!(cart.items[0].quantity, 4);
    assert_eq!(cart.items_price, dec!(40.00));
    // Free standard shipping from $35.
    assert_eq!(cart.shipping_price, Some(dec!(0)));
    assert_eq!(resolver.requests().await.len(), 2);
}

#[tokio::test]
async fn test_remove_reduces_lines() {
    let (store, resolver) = recording_store().await;
    let shirt = item("p1", 5, dec!(10));
    let jeans = item("p2", 5, dec!(30));
    store.add_item(&shirt, 1).await.unwrap();
    store.add_item(&jeans, 1).await.unwrap();

    store.remove_item(&shirt).await.unwrap();

    let cart = store.cart().await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product_id, jeans.product_id);

    let requests = resolver.requests().await;
    let last = requests.last().unwrap();
    assert_eq!(last.items.len(), 1);
}

#[tokio::test]
async fn test_remove_last_line_resets_to_baseline() {
    let (store, _) = recording_store().await;
    let shirt = item("p1", 5, dec!(10));
    store.add_item(&shirt, 2).await.unwrap();

    store.remove_item(&shirt).await.unwrap();

    assert_eq!(store.cart().await, Cart::empty());
    assert_eq!(store.version().await, 2);
}

// ============================================================================
// Serialization
// ============================================================================

#[tokio::test]
async fn test_concurrent_adds_apply_in_call_order() {
    // The first pricing call is slow; the second add must wait for it and
    // build on its result instead of overwriting it.
    let resolver = Arc::new(RecordingResolver::with_delays([
        Duration::from_millis(100),
        Duration::ZERO,
    ]));
    let store = CartStore::load(resolver.clone(), Arc::new(MemoryStorage::new()))
        .await
        .unwrap();

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.add_item(&item("p1", 5, dec!(10)), 1).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.add_item(&item("p2", 5, dec!(10)), 1).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let cart = store.cart().await;
    let products: Vec<_> = cart.items.iter().map(|i| i.product_id.to_string()).collect();
    assert_eq!(products, ["p1", "p2"]);
    assert_eq!(store.version().await, 2);

    let requests = resolver.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].items.len(), 2);
}

#[tokio::test]
async fn test_concurrent_adds_of_same_key_both_count() {
    let resolver = Arc::new(RecordingResolver::with_delays([
        Duration::from_millis(50),
        Duration::from_millis(10),
    ]));
    let store = CartStore::load(resolver, Arc::new(MemoryStorage::new()))
        .await
        .unwrap();
    let shirt = item("p1", 5, dec!(10));

    let adds = (0..2).map(|_| {
        let store = store.clone();
        let shirt = shirt.clone();
        tokio::spawn(async move { store.add_item(&shirt, 1).await })
    });
    let handles: Vec<_> = adds.collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let cart = store.cart().await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.items_price, dec!(20.00));
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_resolver_failure_leaves_cart_unchanged() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(Arc::new(FailingResolver), Arc::new(storage.clone()))
        .await
        .unwrap();

    let err = store
        .add_item(&item("p1", 5, dec!(10)), 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::Resolver(PricingError::Rejected { status: 503, .. })
    ));
    assert_eq!(store.cart().await, Cart::empty());
    assert_eq!(store.version().await, 0);
    assert!(storage.load(CART_SNAPSHOT).await.unwrap().is_none());
}

#[tokio::test]
async fn test_storage_failure_leaves_cart_unchanged() {
    let storage = FlakyStorage::default();
    let store = CartStore::load(
        Arc::new(PolicyResolver::default()),
        Arc::new(storage.clone()),
    )
    .await
    .unwrap();
    store.add_item(&item("p1", 5, dec!(10)), 1).await.unwrap();
    let before = store.cart().await;

    storage.fail_saves(true);
    let err = store
        .add_item(&item("p2", 5, dec!(10)), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::Storage(_)));
    assert_eq!(store.cart().await, before);
    assert_eq!(store.version().await, 1);

    let persisted = load_snapshot::<Cart>(storage.backing(), CART_SNAPSHOT)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.state, before);

    // Recovers once storage is writable again.
    storage.fail_saves(false);
    store.add_item(&item("p2", 5, dec!(10)), 1).await.unwrap();
    assert_eq!(store.cart().await.items.len(), 2);
    assert_eq!(store.version().await, 2);
}

// ============================================================================
// Persistence
// ============================================================================

async fn open_file_store(dir: &Path) -> CartStore {
    CartStore::load(
        Arc::new(PolicyResolver::default()),
        Arc::new(FileStorage::new(dir)),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_round_trip_through_file_storage() {
    let dir = tempfile::tempdir().unwrap();

    let store = open_file_store(dir.path()).await;
    store.add_item(&item("p1", 5, dec!(19.99)), 2).await.unwrap();
    store.add_item(&item("p2", 3, dec!(5.25)), 1).await.unwrap();
    store.set_delivery_date(1).await.unwrap();
    store.set_payment_method("PayPal").await.unwrap();

    let reloaded = open_file_store(dir.path()).await;
    assert_eq!(reloaded.cart().await, store.cart().await);
    assert_eq!(reloaded.version().await, 4);

    let cart = reloaded.cart().await;
    assert_eq!(cart.items_price, dec!(45.23));
    assert_eq!(cart.shipping_price, Some(dec!(6.90)));
    assert_eq!(cart.tax_price, Some(dec!(6.78)));
    assert_eq!(cart.total_price, dec!(58.91));
    assert_eq!(cart.payment_method.as_deref(), Some("PayPal"));
}
