//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::pricing::PolicyResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the trusted pricing resolver.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    resolver: PolicyResolver,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let resolver = PolicyResolver::new(config.pricing.policy());
        Self::with_resolver(config, resolver)
    }

    /// Create application state around an explicit resolver.
    #[must_use]
    pub fn with_resolver(config: StorefrontConfig, resolver: PolicyResolver) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, resolver }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the trusted pricing resolver.
    #[must_use]
    pub fn resolver(&self) -> &PolicyResolver {
        &self.inner.resolver
    }
}
