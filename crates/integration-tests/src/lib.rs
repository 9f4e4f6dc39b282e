//! Integration tests for STEAM Tracker.
//!
//! The storefront router is driven in-process through `tower::ServiceExt`,
//! so no server or network is needed:
//!
//! ```bash
//! cargo test -p steam-tracker-integration-tests
//! ```
//!
//! [`TestApp`] behaves like one browser: it keeps the session cookie between
//! requests. Create a second `TestApp` sharing the same router with
//! [`TestApp::second_visitor`] to simulate another visitor.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{
    HeaderMap, Method, Request, StatusCode,
    header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
};
use steam_tracker_storefront::config::StorefrontConfig;
use steam_tracker_storefront::services::analytics::{AnalyticsEvent, AnalyticsSink, PageName};
use steam_tracker_storefront::state::AppState;
use tower::ServiceExt;

/// Analytics sink that keeps everything it is told.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
    pages: Mutex<Vec<String>>,
}

impl RecordingAnalytics {
    /// Events tracked so far, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Page names reported so far, oldest first.
    pub fn pages(&self) -> Vec<String> {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn page(&self, name: &PageName) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.as_str().to_owned());
    }
}

/// Configuration used by the tests: production defaults, analytics recorded.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::default()
}

/// A fully read response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser talking to the storefront.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub analytics: Arc<RecordingAnalytics>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Storefront with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Storefront with a custom order-processing delay.
    #[must_use]
    pub fn with_checkout_delay(delay: Duration) -> Self {
        Self::with_config(StorefrontConfig {
            checkout_delay: delay,
            ..test_config()
        })
    }

    /// Storefront with an explicit configuration.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let analytics = Arc::new(RecordingAnalytics::default());
        let state = AppState::with_analytics(config, analytics.clone());
        Self {
            router: steam_tracker_storefront::app(state),
            cookie: None,
            analytics,
        }
    }

    /// Another browser (no cookie yet) on the same running storefront.
    #[must_use]
    pub fn second_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
            analytics: Arc::clone(&self.analytics),
        }
    }

    /// Another tab of this browser: same router, same session cookie.
    #[must_use]
    pub fn another_tab(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
            analytics: Arc::clone(&self.analytics),
        }
    }

    /// Whether the storefront has handed this browser a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Full-page `GET`, as a browser navigation.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, false).await
    }

    /// `GET` issued by HTMX.
    pub async fn htmx_get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, true).await
    }

    /// Plain HTML form `POST`.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(encode(fields)), false)
            .await
    }

    /// Form `POST` issued by HTMX.
    pub async fn htmx_post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(encode(fields)), true)
            .await
    }

    /// Add one product to the cart with the quantity currently chosen for it.
    pub async fn add_to_cart(&mut self, product_id: &str) -> TestResponse {
        self.htmx_post_form("/cart/add", &[("product_id", product_id)])
            .await
    }

    /// Step a product's chosen quantity up (`delta > 0`) or down.
    pub async fn step_quantity(&mut self, product_id: &str, delta: i64) -> TestResponse {
        let delta = delta.to_string();
        self.htmx_post_form(
            "/browse/quantity",
            &[("product_id", product_id), ("delta", &delta)],
        )
        .await
    }

    /// The nav badge count, read from the count fragment.
    pub async fn cart_count(&mut self) -> u64 {
        let response = self.htmx_get("/cart/count").await;
        badge_count(&response.body)
    }

    #[allow(clippy::expect_used)]
    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<String>,
        htmx: bool,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(pair) = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn encode(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

/// Number inside the cart badge, or 0 when the badge is hidden.
#[must_use]
pub fn badge_count(html: &str) -> u64 {
    let Some(start) = html.find("id=\"cart-count\"") else {
        return 0;
    };
    let rest = html.get(start..).unwrap_or_default();
    let Some(end) = rest.find("</span></span>") else {
        return 0;
    };
    let inner = rest.get(..end).unwrap_or_default();
    inner
        .rsplit('>')
        .next()
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0)
}
