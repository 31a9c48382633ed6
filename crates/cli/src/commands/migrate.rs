//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! amz migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Storefront migrations live in `crates/storefront/migrations/` and are
//! embedded into the binary at compile time.

use amazona_storefront::config::ClientConfig;
use amazona_storefront::db;

use super::CommandError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if no database is configured, the connection
/// fails, or a migration fails.
pub async fn storefront(config: &ClientConfig) -> Result<(), CommandError> {
    let database_url = config
        .database_url
        .as_ref()
        .ok_or(CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(database_url).await?;

    tracing::info!("Running storefront migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
