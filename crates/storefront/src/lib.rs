//! STEAM Tracker storefront library.
//!
//! A small educational-toy shop: browse and filter a fixed catalog, collect
//! items in a per-visitor cart, and check out through a simulated order call.
//! Pages are rendered on the server with Askama and updated in place by HTMX.
//!
//! The library exposes [`app`] so the router can be exercised in tests
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod views;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary, since they only matter once a
/// client has been initialized.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::page_routes().layer(from_fn_with_state(
            state.clone(),
            middleware::page_view_middleware,
        )))
        .merge(routes::fragment_routes())
        .route("/health", get(health))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
