//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Browse page (product grid, search, filter)
//! GET  /health                 - Health check
//! *    (anything else)         - 404 Not Found
//!
//! # Browse (HTMX fragments)
//! GET  /products/grid          - Filtered product grid (live search)
//! POST /search                 - Explicit search submit (tracked)
//! POST /browse/quantity        - Step a product's chosen quantity
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Add to cart (returns grid, triggers cart-updated)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout page
//! POST /checkout               - Submit order form
//! POST /checkout/quantity      - Update a line quantity
//! POST /checkout/remove        - Remove a line
//! ```

pub mod browse;
pub mod cart;
pub mod checkout;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the full-page routes, including the not-found fallback.
///
/// These are the navigations reported as page views.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(browse::index))
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .fallback(not_found)
}

/// Create the browse fragment routes router.
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/products/grid", get(browse::grid))
        .route("/search", post(browse::search))
        .route("/browse/quantity", post(browse::adjust_quantity))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/count", get(cart::count))
}

/// Create the checkout fragment routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/quantity", post(checkout::update_quantity))
        .route("/remove", post(checkout::remove))
}

/// Create the fragment and form routes for the storefront.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .merge(browse_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}
