//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, no-store)
//! 5. Session layer (tower-sessions with a bounded moka store)
//! 6. Page views (page routes and the 404 fallback only)

pub mod page_view;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use page_view::page_view_middleware;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
