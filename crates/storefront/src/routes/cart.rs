//! Cart route handlers.
//!
//! The cart lives in the visitor's shopping session. Mutations answer with an
//! `HX-Trigger: cart-updated` header so the nav badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::browse::{find_product, is_htmx, parse_filter, render_grid};
use crate::session::{CurrentShop, ExistingShop, ShopSession};
use crate::state::AppState;

/// Event HTMX listens for to refresh cart-dependent fragments.
pub const CART_UPDATED: &str = "cart-updated";

/// Refuse cart edits while an order for this session is being placed.
pub(crate) fn ensure_unlocked(session: &ShopSession) -> Result<()> {
    if session.checkout.is_submitting() {
        return Err(AppError::Conflict(
            "cart is locked while the order is processed".to_string(),
        ));
    }
    Ok(())
}

/// Add to cart form data.
///
/// Carries the current filter so the refreshed grid matches what is shown.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Add the chosen quantity of a product to the cart.
///
/// Returns the refreshed product grid (showing the "Added!" feedback) with an
/// HTMX trigger to update the cart count badge.
#[instrument(skip(state, shop, headers))]
pub async fn add(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let filter = parse_filter(&form.q, &form.category)?;
    let product = find_product(&state, &form.product_id)?;

    let mut session = shop.lock().await;
    ensure_unlocked(&session)?;
    let session = &mut *session;
    let quantity =
        session
            .browse
            .add_to_cart(product, &mut session.cart, state.analytics().as_ref())?;

    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str()), ("quantity", &quantity)]),
    );

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }
    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        render_grid(&state, session, &filter),
    )
        .into_response())
}

/// Cart count badge (HTMX).
#[instrument(skip(shop))]
pub async fn count(ExistingShop(shop): ExistingShop) -> CartCountTemplate {
    let session = shop.lock().await;
    CartCountTemplate {
        count: session.cart.item_count(),
    }
}
