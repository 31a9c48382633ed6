//! The cart store: the only gateway for cart mutations.
//!
//! # Commit protocol
//!
//! Every mutation runs the same steps while holding the store's write gate:
//!
//! 1. Read the committed cart.
//! 2. Build a candidate item list (see [`Cart::with_added`] and friends).
//! 3. Send it to the [`PricingResolver`].
//! 4. Merge items and resolver output into the next cart, persist it, and
//!    only then publish it as the committed state.
//!
//! The gate is a FIFO `tokio` mutex, so concurrently issued mutations apply
//! in call order and each one builds on the previous commit. A failure in
//! step 3 or 4 leaves the committed and persisted state untouched.
//!
//! Readers ([`CartStore::cart`]) never wait on an in-flight pricing call.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use amazona_core::{Cart, CartChangeError, ClientId, LineItem, PricingRequest, ProductId};

use crate::pricing::{PricingError, PricingResolver};
use crate::storage::{
    CART_SNAPSHOT, Snapshot, SnapshotStorage, StorageError, load_snapshot, save_snapshot,
};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Not enough inventory for the requested quantity.
    #[error("not enough items in stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The mutated line was missing after the merge.
    #[error("item not found after updating cart: {0}")]
    NotFound(String),

    /// The pricing resolver failed; nothing was committed.
    #[error("pricing failed: {0}")]
    Resolver(#[from] PricingError),

    /// The snapshot could not be loaded or saved; nothing was committed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CartChangeError> for CartError {
    fn from(err: CartChangeError) -> Self {
        match err {
            CartChangeError::InvalidQuantity(quantity) => Self::InvalidQuantity(quantity),
            CartChangeError::OutOfStock {
                product_id,
                requested,
                available,
            } => Self::OutOfStock {
                product_id,
                requested,
                available,
            },
        }
    }
}

/// Persisted, resolver-backed cart for one shopper session.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    resolver: Arc<dyn PricingResolver>,
    storage: Arc<dyn SnapshotStorage>,
    /// Serializes mutations.
    gate: Mutex<()>,
    committed: RwLock<Snapshot<Cart>>,
}

impl CartStore {
    /// Hydrate the store from `storage`, starting empty if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the saved snapshot cannot be read.
    #[instrument(skip_all)]
    pub async fn load(
        resolver: Arc<dyn PricingResolver>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Result<Self, CartError> {
        let committed = match load_snapshot::<Cart>(storage.as_ref(), CART_SNAPSHOT).await? {
            Some(snapshot) => {
                debug!(
                    version = snapshot.version,
                    lines = snapshot.state.items.len(),
                    "Cart hydrated"
                );
                snapshot
            }
            None => Snapshot::new(0, Cart::empty()),
        };

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                resolver,
                storage,
                gate: Mutex::new(()),
                committed: RwLock::new(committed),
            }),
        })
    }

    /// The committed cart.
    pub async fn cart(&self) -> Cart {
        self.inner.committed.read().await.state.clone()
    }

    /// Number of commits applied to this cart since it was first created.
    pub async fn version(&self) -> u64 {
        self.inner.committed.read().await.version
    }

    /// Add `quantity` units of `item` and return the affected line's client ID.
    ///
    /// If the cart already holds `item`'s key, the stored line's quantity is
    /// increased and its other fields are kept. Otherwise `item` is appended
    /// with `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity,
    /// `CartError::OutOfStock` if the stock bound would be exceeded,
    /// `CartError::Resolver`/`CartError::Storage` if the commit was aborted.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, color = %item.color, size = %item.size))]
    pub async fn add_item(&self, item: &LineItem, quantity: u32) -> Result<ClientId, CartError> {
        let cart = self
            .mutate(|cart| {
                let items = cart.with_added(item, quantity).inspect_err(|e| {
                    warn!(error = %e, "Add to cart rejected");
                })?;
                Ok(Some(cart.pricing_request(items)))
            })
            .await?
            .ok_or_else(|| CartError::NotFound(item.key().to_string()))?;

        cart.client_id_of(item)
            .cloned()
            .ok_or_else(|| CartError::NotFound(item.key().to_string()))
    }

    /// Set the quantity of `item`'s line. Does nothing if the line is absent.
    ///
    /// The stored line keeps its own metadata; only the quantity changes.
    /// No stock check is made here.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity, or
    /// `CartError::Resolver`/`CartError::Storage` if the commit was aborted.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, color = %item.color, size = %item.size))]
    pub async fn update_item(&self, item: &LineItem, quantity: u32) -> Result<(), CartError> {
        self.mutate(|cart| {
            Ok(cart
                .with_quantity(item, quantity)?
                .map(|items| cart.pricing_request(items)))
        })
        .await?;
        Ok(())
    }

    /// Remove every line matching `item`'s key.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Resolver`/`CartError::Storage` if the commit was aborted.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, color = %item.color, size = %item.size))]
    pub async fn remove_item(&self, item: &LineItem) -> Result<(), CartError> {
        self.mutate(|cart| Ok(Some(cart.pricing_request(cart.without(item)))))
            .await?;
        Ok(())
    }

    /// Select a delivery option and re-price the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Resolver` if the option is rejected by the resolver,
    /// or `CartError::Storage` if the commit could not be persisted.
    #[instrument(skip(self))]
    pub async fn set_delivery_date(&self, index: usize) -> Result<Cart, CartError> {
        let cart = self
            .mutate(|cart| Ok(Some(PricingRequest::new(cart.items.clone(), Some(index)))))
            .await?;
        // Always `Some`: the closure never skips.
        Ok(cart.unwrap_or_default())
    }

    /// Record the chosen payment method. Prices are not affected.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the commit could not be persisted.
    #[instrument(skip(self))]
    pub async fn set_payment_method(&self, method: &str) -> Result<(), CartError> {
        let _gate = self.inner.gate.lock().await;
        let base = self.inner.committed.read().await.clone();
        let next = Snapshot::new(
            base.version + 1,
            Cart {
                payment_method: Some(method.to_string()),
                ..base.state
            },
        );
        self.publish(next).await?;
        Ok(())
    }

    /// Reset the cart to empty (explicit clear or sign-out).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the empty cart could not be persisted.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        let _gate = self.inner.gate.lock().await;
        let version = self.inner.committed.read().await.version;
        self.publish(Snapshot::new(version + 1, Cart::empty()))
            .await?;
        info!("Cart cleared");
        Ok(())
    }

    /// Run one serialized mutation.
    ///
    /// `plan` turns the committed cart into a pricing request, or `None` to
    /// leave the cart untouched (no resolver call, no commit). Returns the
    /// newly committed cart, if any.
    async fn mutate<F>(&self, plan: F) -> Result<Option<Cart>, CartError>
    where
        F: FnOnce(&Cart) -> Result<Option<PricingRequest>, CartError>,
    {
        let _gate = self.inner.gate.lock().await;
        let base = self.inner.committed.read().await.clone();

        let Some(request) = plan(&base.state)? else {
            debug!("No matching line, cart unchanged");
            return Ok(None);
        };

        let summary = self
            .inner
            .resolver
            .resolve(&request)
            .await
            .inspect_err(|e| warn!(error = %e, "Pricing failed, cart unchanged"))?;

        let next = Snapshot::new(
            base.version + 1,
            base.state.commit(request.items, summary),
        );
        self.publish(next).await.map(Some)
    }

    /// Persist `next`, then make it the committed state. Caller holds the gate.
    async fn publish(&self, next: Snapshot<Cart>) -> Result<Cart, CartError> {
        save_snapshot(self.inner.storage.as_ref(), CART_SNAPSHOT, &next)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to persist cart, cart unchanged"))?;

        debug!(
            version = next.version,
            lines = next.state.items.len(),
            total = %next.state.total_price,
            "Cart committed"
        );

        let cart = next.state.clone();
        *self.inner.committed.write().await = next;
        Ok(cart)
    }
}
