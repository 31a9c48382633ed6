//! CLI command implementations.

pub mod cart;
pub mod history;
pub mod migrate;

use std::sync::Arc;

use amazona_storefront::config::{ClientConfig, ConfigError, StorefrontConfig};
use amazona_storefront::db;
use amazona_storefront::pricing::{PolicyResolver, PricingError, PricingResolver, RemoteResolver};
use amazona_storefront::storage::{FileStorage, PgStorage, SnapshotStorage, StorageError};
use amazona_storefront::CartError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable present but unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Snapshot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Pricing service unreachable or misconfigured.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Cart mutation rejected or aborted.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Open snapshot storage: `PostgreSQL` when a database URL is configured,
/// otherwise JSON files under the snapshot directory.
///
/// # Errors
///
/// Returns `CommandError::Database` if the database cannot be reached.
pub async fn open_storage(config: &ClientConfig) -> Result<Arc<dyn SnapshotStorage>, CommandError> {
    match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            tracing::debug!(namespace = %config.namespace, "Using database snapshots");
            Ok(Arc::new(PgStorage::new(pool, config.namespace.clone())))
        }
        None => {
            tracing::debug!(dir = %config.snapshot_dir.display(), "Using file snapshots");
            Ok(Arc::new(FileStorage::new(config.snapshot_dir.clone())))
        }
    }
}

/// Build the pricing resolver: the remote service, or the policy evaluated
/// in-process when `local` is set.
///
/// # Errors
///
/// Returns `CommandError` if the pricing URL or local policy settings are invalid.
pub fn open_resolver(
    config: &ClientConfig,
    local: bool,
) -> Result<Arc<dyn PricingResolver>, CommandError> {
    if local {
        let policy = StorefrontConfig::from_env()?.pricing.policy();
        return Ok(Arc::new(PolicyResolver::new(policy)));
    }

    let resolver = RemoteResolver::new(&config.pricing_url, config.pricing_timeout)?;
    tracing::debug!(endpoint = %resolver.endpoint(), "Using remote pricing");
    Ok(Arc::new(resolver))
}
