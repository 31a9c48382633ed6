//! `PostgreSQL` connection and schema for snapshot storage.
//!
//! Only store clients that opt into database snapshots use this; the
//! pricing service itself never connects.
//!
//! Schema: `storefront.snapshot (namespace, name, body JSONB, updated_at)`,
//! one row per shopper namespace and record name.
//!
//! Apply the embedded migrations with `amz migrate`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Migrations from `crates/storefront/migrations/`, embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect a small pool; a CLI session or client process needs only a few
/// connections.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}

/// Bring the schema up to date.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
