//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::analytics::{self, Analytics};
use crate::session::SessionRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the session registry, the analytics sink and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    sessions: SessionRegistry,
    analytics: Analytics,
}

impl AppState {
    /// Create application state with the sink selected by `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let analytics = analytics::from_mode(config.analytics);
        Self::with_analytics(config, analytics)
    }

    /// Create application state with an explicit analytics sink.
    #[must_use]
    pub fn with_analytics(config: StorefrontConfig, analytics: Analytics) -> Self {
        let sessions = SessionRegistry::new(config.session_idle);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::standard(),
                sessions,
                analytics,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the shopping session registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    /// Get the analytics sink.
    #[must_use]
    pub fn analytics(&self) -> &Analytics {
        &self.inner.analytics
    }
}
