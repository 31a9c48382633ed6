//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Pricing service (`StorefrontConfig`)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `PRICING_TAX_RATE` - Sales tax rate (default: 0.15)
//! - `PRICING_FREE_SHIPPING_MIN` - Items subtotal for free standard shipping (default: 35)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Store clients (`ClientConfig`)
//! - `PRICING_URL` - Base URL of the pricing service (default: <http://127.0.0.1:3000>)
//! - `PRICING_TIMEOUT_SECS` - Pricing request timeout (default: 10)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` for snapshots (optional)
//! - `AMAZONA_SNAPSHOT_DIR` - Snapshot directory when no database is set (default: .amazona)
//! - `AMAZONA_NAMESPACE` - Shopper namespace for database snapshots (default: default)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use crate::pricing::PricingPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Pricing service configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Tax and shipping rules
    pub pricing: PricingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Tax and shipping rules for the trusted resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    pub tax_rate: Decimal,
    pub free_shipping_min: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(15, 2),
            free_shipping_min: Decimal::new(35, 0),
        }
    }
}

impl PricingConfig {
    /// The resolver policy described by this configuration.
    #[must_use]
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy::default()
            .with_tax_rate(self.tax_rate)
            .with_free_shipping_min(self.free_shipping_min)
    }
}

/// Configuration for processes that own cart and history stores.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the pricing service
    pub pricing_url: String,
    /// Timeout for a pricing round trip
    pub pricing_timeout: Duration,
    /// `PostgreSQL` URL for snapshot storage (contains password)
    pub database_url: Option<SecretString>,
    /// Snapshot directory used when no database is configured
    pub snapshot_dir: PathBuf,
    /// Shopper namespace for database snapshots
    pub namespace: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = PricingConfig::default();

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env_or("STOREFRONT_PORT", 3000)?,
            pricing: PricingConfig {
                tax_rate: parse_env_or("PRICING_TAX_RATE", defaults.tax_rate)?,
                free_shipping_min: parse_env_or(
                    "PRICING_FREE_SHIPPING_MIN",
                    defaults.free_shipping_min,
                )?,
            },
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            pricing_url: get_env_or_default("PRICING_URL", "http://127.0.0.1:3000"),
            pricing_timeout: Duration::from_secs(parse_env_or("PRICING_TIMEOUT_SECS", 10)?),
            database_url: get_database_url("STOREFRONT_DATABASE_URL"),
            snapshot_dir: PathBuf::from(get_env_or_default("AMAZONA_SNAPSHOT_DIR", ".amazona")),
            namespace: get_env_or_default("AMAZONA_NAMESPACE", "default"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key).map_or(Ok(default), |value| parse_value(key, &value))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
