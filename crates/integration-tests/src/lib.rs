//! Integration tests for Amazona.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p amazona-integration-tests
//! ```
//!
//! No external services are needed: the pricing service is started on an
//! ephemeral port inside the test process, and snapshots go to memory or a
//! temporary directory.
//!
//! # Test Categories
//!
//! - `cart_store` - Cart mutations, serialization and commit semantics
//! - `browsing_history` - Most-recently-viewed list persistence
//! - `pricing_api` - Pricing service HTTP API, including the remote resolver

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use amazona_core::{ClientId, LineItem, PricingRequest, PricingSummary, ProductId};
use amazona_storefront::config::{PricingConfig, StorefrontConfig};
use amazona_storefront::pricing::{PolicyResolver, PricingError, PricingResolver};
use amazona_storefront::routes;
use amazona_storefront::state::AppState;
use amazona_storefront::storage::{MemoryStorage, SnapshotStorage, StorageError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

/// A line item for product `product` in Red/M with the given stock and price.
#[must_use]
pub fn item(product: &str, stock: u32, price: Decimal) -> LineItem {
    LineItem {
        client_id: ClientId::generate(),
        product_id: ProductId::new(product),
        name: format!("Product {product}"),
        slug: format!("product-{product}"),
        category: "Shirts".to_string(),
        image: format!("/images/{product}.jpg"),
        color: "Red".to_string(),
        size: "M".to_string(),
        quantity: 1,
        count_in_stock: stock,
        unit_price: price,
    }
}

/// Start the pricing service on an ephemeral local port.
///
/// The server runs until the test's runtime shuts down.
///
/// # Errors
///
/// Returns an I/O error if no local port can be bound.
pub async fn spawn_pricing_service() -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let config = StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        pricing: PricingConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let app = routes::router(AppState::new(config));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(addr)
}

/// Policy resolver that records every request and can be slowed down.
///
/// Each call waits for the next queued delay, if any, before pricing.
pub struct RecordingResolver {
    inner: PolicyResolver,
    delays: Mutex<VecDeque<Duration>>,
    requests: Mutex<Vec<PricingRequest>>,
}

impl Default for RecordingResolver {
    fn default() -> Self {
        Self::with_delays(Vec::<Duration>::new())
    }
}

impl RecordingResolver {
    /// Delay the first calls by `delays`, in order.
    pub fn with_delays(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            inner: PolicyResolver::default(),
            delays: Mutex::new(delays.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in arrival order.
    pub async fn requests(&self) -> Vec<PricingRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PricingResolver for RecordingResolver {
    async fn resolve(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        self.requests.lock().await.push(request.clone());
        let delay = self.delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.resolve(request).await
    }
}

/// Resolver that rejects every request, as if the service were down.
#[derive(Debug, Default)]
pub struct FailingResolver;

#[async_trait]
impl PricingResolver for FailingResolver {
    async fn resolve(&self, _request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        Err(PricingError::Rejected {
            status: 503,
            message: "pricing unavailable".to_string(),
        })
    }
}

/// Memory storage whose saves can be made to fail.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    failing: Arc<AtomicBool>,
}

impl FlakyStorage {
    /// The records actually written.
    #[must_use]
    pub fn backing(&self) -> &MemoryStorage {
        &self.inner
    }

    /// Make subsequent saves fail (`true`) or succeed (`false`).
    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStorage for FlakyStorage {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>, StorageError> {
        self.inner.load(name).await
    }

    async fn save(&self, name: &str, record: &serde_json::Value) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.save(name, record).await
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.inner.remove(name).await
    }
}
