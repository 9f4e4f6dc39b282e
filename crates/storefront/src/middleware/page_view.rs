//! Page-name notifications for analytics.
//!
//! Layered on the page routes and the not-found fallback only. Reports a page
//! view for every full-page `GET` reaching them, including unknown paths
//! ("Unknown: <path>"). HTMX requests are partial refreshes, not navigations,
//! and are skipped.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::routes::browse::is_htmx;
use crate::services::analytics::PageName;
use crate::state::AppState;

/// Middleware that reports route changes to the analytics sink.
pub async fn page_view_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::GET && !is_htmx(request.headers()) {
        state
            .analytics()
            .page(&PageName::for_path(request.uri().path()));
    }

    next.run(request).await
}
