//! Third-party analytics hooks.
//!
//! Events are fire-and-forget. A sink never returns an error and the shop
//! never branches on whether one is configured: when analytics is off the
//! [`NoopAnalytics`] sink is injected instead.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::config::AnalyticsMode;

/// Custom events emitted by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "properties")]
pub enum AnalyticsEvent {
    #[serde(rename = "Item Added To Cart", rename_all = "camelCase")]
    ItemAddedToCart {
        product_id: String,
        product_name: String,
        quantity: u32,
        #[serde(with = "rust_decimal::serde::float")]
        unit_price: Decimal,
    },
    #[serde(rename = "Search Performed", rename_all = "camelCase")]
    SearchPerformed {
        query: String,
        results_count: usize,
        category: String,
    },
    #[serde(rename = "Checkout Completed", rename_all = "camelCase")]
    CheckoutCompleted {
        #[serde(with = "rust_decimal::serde::float")]
        order_total: Decimal,
        item_count: usize,
        /// `"true"` or `"false"`.
        subscribe: String,
    },
}

impl AnalyticsEvent {
    /// Event name as sent to the provider.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ItemAddedToCart { .. } => "Item Added To Cart",
            Self::SearchPerformed { .. } => "Search Performed",
            Self::CheckoutCompleted { .. } => "Checkout Completed",
        }
    }
}

/// Human-readable page name reported on navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageName(String);

impl PageName {
    /// Map a request path to its page name.
    ///
    /// ```
    /// use steam_tracker_storefront::services::analytics::PageName;
    ///
    /// assert_eq!(PageName::for_path("/").as_str(), "Browse: Products");
    /// assert_eq!(PageName::for_path("/checkout").as_str(), "Checkout");
    /// assert_eq!(PageName::for_path("/nope").as_str(), "Unknown: /nope");
    /// ```
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        match path {
            "/" => Self("Browse: Products".to_owned()),
            "/checkout" => Self("Checkout".to_owned()),
            other => Self(format!("Unknown: {other}")),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Destination for analytics events.
pub trait AnalyticsSink: Send + Sync {
    /// Record a custom event.
    fn track(&self, event: &AnalyticsEvent);

    /// Record that the user navigated to a page.
    fn page(&self, name: &PageName);
}

/// Shared handle to the configured sink.
pub type Analytics = Arc<dyn AnalyticsSink>;

/// Build the sink selected by configuration.
#[must_use]
pub fn from_mode(mode: AnalyticsMode) -> Analytics {
    match mode {
        AnalyticsMode::Off => Arc::new(NoopAnalytics),
        AnalyticsMode::Log => Arc::new(TracingAnalytics),
    }
}

/// Sink used when analytics is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: &AnalyticsEvent) {}

    fn page(&self, _name: &PageName) {}
}

/// Sink that writes every event as a structured log record on the
/// `analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        info!(target: "analytics", event = event.name(), %payload, "track");
    }

    fn page(&self, name: &PageName) {
        info!(target: "analytics", page = name.as_str(), "page");
    }
}
