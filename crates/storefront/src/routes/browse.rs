//! Browse page route handlers.
//!
//! The product grid is re-rendered as an HTMX fragment on every keystroke
//! (`GET /products/grid`); only an explicit submit (`POST /search`) reports a
//! search to analytics.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use steam_tracker_core::{CategoryFilter, ProductId};
use tracing::instrument;

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::session::{CurrentShop, ExistingShop, ShopSession};
use crate::state::AppState;
use crate::views::browse::{self, BrowseError, ProductFilter};
use crate::views::nav::NavView;

/// Header HTMX adds to its own requests.
const HX_REQUEST: &str = "hx-request";

/// Whether the request came from HTMX (and wants a fragment back).
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

// =============================================================================
// View Models
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub price: String,
    pub in_stock: bool,
    pub quantity: u32,
    pub just_added: bool,
}

/// One entry of the category dropdown.
#[derive(Clone)]
pub struct CategoryOption {
    pub label: String,
    pub selected: bool,
}

/// Everything the product grid needs to render.
#[derive(Clone)]
pub struct GridView {
    pub query: String,
    pub category: String,
    pub products: Vec<ProductCardView>,
    /// Some card shows "Added!"; the grid schedules a refresh to clear it.
    pub has_feedback: bool,
    pub feedback_ms: u64,
}

impl GridView {
    fn build(state: &AppState, shop: &ShopSession, filter: &ProductFilter) -> Self {
        let window = state.config().added_feedback;
        let products: Vec<ProductCardView> = filter
            .apply(state.catalog())
            .into_iter()
            .map(|p| card(p, shop, window))
            .collect();

        Self {
            query: filter.query.clone(),
            category: filter.category.to_string(),
            has_feedback: products.iter().any(|p| p.just_added),
            feedback_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            products,
        }
    }
}

fn card(product: &Product, shop: &ShopSession, window: std::time::Duration) -> ProductCardView {
    ProductCardView {
        id: product.id.to_string(),
        name: product.name.clone(),
        description: product.description.clone(),
        image: product.image.clone(),
        category: product.category.to_string(),
        price: product.price.display(),
        in_stock: product.in_stock,
        quantity: shop.browse.quantity_for(&product.id).get(),
        just_added: shop.browse.recently_added(&product.id, window),
    }
}

// =============================================================================
// Forms and Queries
// =============================================================================

/// Filter parameters shared by every browse request.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

impl FilterParams {
    /// Convert to a product filter.
    fn to_filter(&self) -> Result<ProductFilter> {
        parse_filter(&self.q, &self.category)
    }
}

/// Build a product filter from form values. An empty category means "All".
pub(crate) fn parse_filter(query: &str, category: &str) -> Result<ProductFilter> {
    let category = if category.is_empty() {
        CategoryFilter::All
    } else {
        category
            .parse()
            .map_err(|e| AppError::BadRequest(format!("{e}")))?
    };
    Ok(ProductFilter::new(query, category))
}

/// Quantity picker form data.
///
/// Carries the current filter so the refreshed grid matches what is shown.
#[derive(Debug, Deserialize)]
pub struct AdjustQuantityForm {
    pub product_id: String,
    pub delta: i64,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Browse page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/browse.html")]
pub struct BrowsePageTemplate {
    pub nav: NavView,
    pub categories: Vec<CategoryOption>,
    pub grid: GridView,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
}

fn category_options(state: &AppState, selected: CategoryFilter) -> Vec<CategoryOption> {
    state
        .catalog()
        .categories()
        .into_iter()
        .map(|c| CategoryOption {
            label: c.to_string(),
            selected: c == selected,
        })
        .collect()
}

pub(crate) fn render_page(
    state: &AppState,
    shop: &ShopSession,
    filter: &ProductFilter,
) -> BrowsePageTemplate {
    BrowsePageTemplate {
        nav: NavView::new(&shop.cart, "/"),
        categories: category_options(state, filter.category),
        grid: GridView::build(state, shop, filter),
    }
}

pub(crate) fn render_grid(
    state: &AppState,
    shop: &ShopSession,
    filter: &ProductFilter,
) -> ProductGridTemplate {
    ProductGridTemplate {
        grid: GridView::build(state, shop, filter),
    }
}

/// Look up a product posted by a form.
pub(crate) fn find_product<'a>(state: &'a AppState, id: &str) -> Result<&'a Product> {
    let id = ProductId::from(id);
    state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::from(BrowseError::UnknownProduct(id)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the browse page.
#[instrument(skip(state, shop))]
pub async fn index(
    State(state): State<AppState>,
    ExistingShop(shop): ExistingShop,
    Query(params): Query<FilterParams>,
) -> Result<BrowsePageTemplate> {
    let filter = params.to_filter()?;
    let mut session = shop.lock().await;
    session.browse.expire_feedback(state.config().added_feedback);
    Ok(render_page(&state, &session, &filter))
}

/// Product grid fragment for live filtering (HTMX).
#[instrument(skip(state, shop))]
pub async fn grid(
    State(state): State<AppState>,
    ExistingShop(shop): ExistingShop,
    Query(params): Query<FilterParams>,
) -> Result<ProductGridTemplate> {
    let filter = params.to_filter()?;
    let session = shop.lock().await;
    Ok(render_grid(&state, &session, &filter))
}

/// Explicit search submit.
///
/// Reports the search, then renders the grid (HTMX) or the whole page.
#[instrument(skip(state, shop, headers))]
pub async fn search(
    State(state): State<AppState>,
    ExistingShop(shop): ExistingShop,
    headers: HeaderMap,
    Form(params): Form<FilterParams>,
) -> Result<Response> {
    let filter = params.to_filter()?;
    let results_count = filter.apply(state.catalog()).len();
    browse::submit_search(&filter, results_count, state.analytics().as_ref());

    let session = shop.lock().await;
    if is_htmx(&headers) {
        return Ok(render_grid(&state, &session, &filter).into_response());
    }
    Ok(render_page(&state, &session, &filter).into_response())
}

/// Step a product's chosen quantity up or down.
#[instrument(skip(state, shop, headers))]
pub async fn adjust_quantity(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<AdjustQuantityForm>,
) -> Result<Response> {
    let filter = parse_filter(&form.q, &form.category)?;
    let product = find_product(&state, &form.product_id)?;

    let mut session = shop.lock().await;
    session.browse.adjust_quantity(&product.id, form.delta.signum());

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(render_grid(&state, &session, &filter).into_response())
}
