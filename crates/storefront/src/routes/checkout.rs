//! Checkout page route handlers.
//!
//! The page shows the cart lines with quantity controls, a running subtotal
//! and the order form. Submitting a valid form holds the request for the
//! configured processing delay, then shows the confirmation.
//!
//! Only carts filled from the browse page can be checked out, so nothing here
//! starts a shopping session; without one the page shows the empty cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use steam_tracker_core::ProductId;
use tracing::instrument;

use crate::cart::CartEntry;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::browse::is_htmx;
use crate::routes::cart::{CART_UPDATED, ensure_unlocked};
use crate::session::{ExistingShop, ShopSession};
use crate::state::AppState;
use crate::views::checkout::{self, CheckoutForm, CheckoutPhase, OrderConfirmation, SubmitError};
use crate::views::nav::NavView;

// =============================================================================
// View Models
// =============================================================================

/// One cart line on the checkout page.
#[derive(Clone)]
pub struct CheckoutLineView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartEntry> for CheckoutLineView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.product.id.to_string(),
            name: entry.product.name.clone(),
            image: entry.product.image.clone(),
            unit_price: entry.product.price.display(),
            quantity: entry.quantity.get(),
            line_total: entry.line_total().display(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Quantity input on a cart line.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove button on a cart line.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub product_id: String,
}

/// Order form as posted by the browser.
///
/// An unchecked checkbox is simply absent from the form body.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub subscribe: Option<String>,
}

impl From<OrderForm> for CheckoutForm {
    fn from(form: OrderForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            subscribe: form.subscribe.is_some(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutPageTemplate {
    pub nav: NavView,
    pub lines: Vec<CheckoutLineView>,
    pub subtotal: String,
    pub name: String,
    pub email: String,
    pub subscribe: bool,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub is_submitting: bool,
}

/// Shown instead of the form when the cart is empty.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout_empty.html")]
pub struct EmptyCartTemplate {
    pub nav: NavView,
}

/// Order confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "pages/order_success.html")]
pub struct OrderSuccessTemplate {
    pub nav: NavView,
    pub name: String,
    pub email: String,
    pub subscribe: bool,
    pub order_total: String,
    pub item_count: u64,
    pub placed_at: String,
}

impl OrderSuccessTemplate {
    fn new(nav: NavView, order: &OrderConfirmation) -> Self {
        Self {
            nav,
            name: order.name.clone(),
            email: order.email.to_string(),
            subscribe: order.subscribe,
            order_total: order.order_total.display(),
            item_count: order.item_count,
            placed_at: order.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

fn nav(session: &ShopSession) -> NavView {
    NavView::new(&session.cart, "/checkout")
}

/// Render whatever the checkout page currently shows for this session.
fn render(session: &ShopSession) -> Response {
    if let CheckoutPhase::Completed(order) = session.checkout.phase() {
        return OrderSuccessTemplate::new(nav(session), order).into_response();
    }
    if session.cart.is_empty() && !session.checkout.is_submitting() {
        return EmptyCartTemplate { nav: nav(session) }.into_response();
    }

    let form = session.checkout.form();
    let errors = session.checkout.errors();
    CheckoutPageTemplate {
        nav: nav(session),
        lines: session
            .cart
            .entries()
            .iter()
            .map(CheckoutLineView::from)
            .collect(),
        subtotal: session.cart.subtotal().display(),
        name: form.name.clone(),
        email: form.email.clone(),
        subscribe: form.subscribe,
        name_error: errors.name.clone(),
        email_error: errors.email.clone(),
        is_submitting: session.checkout.is_submitting(),
    }
    .into_response()
}

/// Response after a cart line changed.
fn cart_changed(headers: &HeaderMap, session: &ShopSession) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/checkout").into_response();
    }
    (AppendHeaders([("HX-Trigger", CART_UPDATED)]), render(session)).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
///
/// Opening the page starts a fresh form; a confirmation from the last order
/// is dropped.
#[instrument(skip(shop))]
pub async fn show(ExistingShop(shop): ExistingShop) -> Response {
    let mut session = shop.lock().await;
    session.checkout.reset();
    render(&session)
}

/// Change a line's quantity. Anything below 1 removes the line.
#[instrument(skip(shop, headers))]
pub async fn update_quantity(
    ExistingShop(shop): ExistingShop,
    headers: HeaderMap,
    Form(form): Form<UpdateQuantityForm>,
) -> Result<Response> {
    let mut session = shop.lock().await;
    ensure_unlocked(&session)?;

    session
        .cart
        .update_quantity(&ProductId::from(form.product_id), form.quantity);
    Ok(cart_changed(&headers, &session))
}

/// Remove a line from the cart.
#[instrument(skip(shop, headers))]
pub async fn remove(
    ExistingShop(shop): ExistingShop,
    headers: HeaderMap,
    Form(form): Form<RemoveLineForm>,
) -> Result<Response> {
    let mut session = shop.lock().await;
    ensure_unlocked(&session)?;

    session.cart.remove_item(&ProductId::from(form.product_id));
    Ok(cart_changed(&headers, &session))
}

/// Submit the order form.
///
/// Invalid input re-renders the form with inline messages (422). A valid
/// submission waits out the processing delay and returns the confirmation.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ExistingShop(shop): ExistingShop,
    headers: HeaderMap,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let result = checkout::place_order(
        shop.clone(),
        form.into(),
        state.analytics().clone(),
        state.config().checkout_delay,
    )
    .await;

    let session = shop.lock().await;
    match result {
        Ok(order) => {
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_total", &order.order_total.to_string())]),
            );
            let page = OrderSuccessTemplate::new(nav(&session), &order);
            if is_htmx(&headers) {
                return Ok(
                    (AppendHeaders([("HX-Trigger", CART_UPDATED)]), page).into_response()
                );
            }
            Ok(page.into_response())
        }
        Err(SubmitError::Invalid(_)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&session)).into_response())
        }
        Err(SubmitError::EmptyCart) => Ok(render(&session)),
        Err(e @ SubmitError::AlreadySubmitting) => Err(AppError::Conflict(e.to_string())),
        Err(e @ SubmitError::Aborted) => Err(AppError::Internal(e.to_string())),
    }
}
