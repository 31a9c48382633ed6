//! HTTP client for the storefront's pricing endpoint.
//!
//! Uses `reqwest` for transport. Identical requests within a short window
//! are answered from a `moka` cache, since the resolver is a pure function
//! of the item list.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};
use url::Url;

use amazona_core::{PricingRequest, PricingSummary};

use super::{PricingError, PricingResolver};

/// Path of the pricing endpoint relative to the storefront base URL.
pub const PRICING_PATH: &str = "api/pricing";

/// How long a priced item list is reused.
const CACHE_TTL: Duration = Duration::from_secs(30);

/// Resolver calling a remote storefront over HTTP.
#[derive(Clone)]
pub struct RemoteResolver {
    inner: Arc<RemoteResolverInner>,
}

struct RemoteResolverInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<String, PricingSummary>,
}

impl RemoteResolver {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Url` if the base URL is invalid, or
    /// `PricingError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PricingError> {
        // A trailing slash keeps the last path segment when joining.
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        let endpoint = base.join(PRICING_PATH)?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(RemoteResolverInner {
                client,
                endpoint,
                cache,
            }),
        })
    }

    /// The fully resolved pricing endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    async fn fetch(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Pricing service returned non-success status"
            );
            return Err(PricingError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse pricing response"
            );
            PricingError::Parse(e)
        })
    }
}

#[async_trait]
impl PricingResolver for RemoteResolver {
    #[instrument(skip(self, request), fields(lines = request.items.len(), endpoint = %self.inner.endpoint))]
    async fn resolve(&self, request: &PricingRequest) -> Result<PricingSummary, PricingError> {
        let key = serde_json::to_string(request)?;

        if let Some(summary) = self.inner.cache.get(&key).await {
            debug!("Pricing cache hit");
            return Ok(summary);
        }

        let summary = self.fetch(request).await?;
        self.inner.cache.insert(key, summary.clone()).await;
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        let a = RemoteResolver::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        let b = RemoteResolver::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(a.endpoint().as_str(), "http://localhost:3000/api/pricing");
        assert_eq!(a.endpoint(), b.endpoint());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let r = RemoteResolver::new("https://shop.example.com/store", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            r.endpoint().as_str(),
            "https://shop.example.com/store/api/pricing"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RemoteResolver::new("not a url", Duration::from_secs(1)),
            Err(PricingError::Url(_))
        ));
    }
}
