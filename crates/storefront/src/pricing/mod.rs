//! Pricing resolution for carts.
//!
//! # Architecture
//!
//! - The cart store never prices items itself. Every mutation sends its
//!   candidate item list to a [`PricingResolver`] and commits whatever the
//!   resolver returns as the cart's derived fields.
//! - [`PolicyResolver`] is the trusted server-side implementation (tax rate,
//!   delivery options, free-shipping threshold). The storefront binary exposes
//!   it at `POST /api/pricing`.
//! - [`RemoteResolver`] calls that endpoint over HTTP from a client process.
//!
//! # Example
//!
//! ```rust,ignore
//! use amazona_storefront::pricing::{PricingResolver, RemoteResolver};
//!
//! let resolver = RemoteResolver::new(&config.pricing_url, config.pricing_timeout)?;
//! let summary = resolver.resolve(&cart.pricing_request(items)).await?;
//! ```

mod policy;
mod remote;

pub use policy::{PolicyResolver, PricingPolicy};
pub use remote::RemoteResolver;

use amazona_core::{PricingRequest, PricingSummary};
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a pricing resolver.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The candidate item list is malformed.
    #[error("invalid items: {0}")]
    InvalidItems(String),

    /// HTTP request to a remote resolver failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote resolver rejected the request.
    #[error("pricing service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The remote resolver answered with something other than a pricing summary.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid resolver endpoint.
    #[error("invalid pricing URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Trusted computation of a cart's derived fields.
///
/// Implementations must be pure with respect to the cart: the same request
/// against the same policy yields the same prices, and nothing is written
/// back to the caller's state.
#[async_trait]
pub trait PricingResolver: Send + Sync {
    /// Price a candidate item list.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidItems` for malformed input, or a
    /// transport error for remote resolvers.
    async fn resolve(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError>;
}
