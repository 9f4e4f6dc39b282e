//! Browse page state: filtering, per-product quantity pickers and the
//! short-lived "added" acknowledgement.
//!
//! None of this is cart state. It is the transient UI state of the product
//! grid and resets independently of the cart.

use std::collections::HashMap;
use std::time::Duration;

use steam_tracker_core::{CategoryFilter, ProductId, Quantity, text};
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

use crate::cart::CartStore;
use crate::catalog::{Catalog, Product};
use crate::services::analytics::{AnalyticsEvent, AnalyticsSink};

/// Errors from browse page actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrowseError {
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("product is out of stock: {0}")]
    OutOfStock(ProductId),
}

/// Search text plus category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl ProductFilter {
    #[must_use]
    pub fn new(query: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Case-insensitive substring match on the name, and category match.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.query.to_lowercase();
        product.name.to_lowercase().contains(&needle) && self.category.matches(product.category)
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .products()
            .iter()
            .filter(|p| self.matches(p))
            .collect()
    }
}

/// Per-session browse page state.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    quantities: HashMap<ProductId, Quantity>,
    added_at: HashMap<ProductId, Instant>,
}

impl BrowseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity currently chosen for a product (1 until changed).
    #[must_use]
    pub fn quantity_for(&self, product_id: &ProductId) -> Quantity {
        self.quantities.get(product_id).copied().unwrap_or_default()
    }

    /// Step the chosen quantity by `delta`, clamped at 1.
    pub fn adjust_quantity(&mut self, product_id: &ProductId, delta: i64) -> Quantity {
        let next = self.quantity_for(product_id).step(delta);
        self.quantities.insert(product_id.clone(), next);
        next
    }

    /// Add the chosen quantity of `product` to the cart.
    ///
    /// Out-of-stock products are refused here; the cart itself does not
    /// check stock.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::OutOfStock` if the product is not in stock.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        cart: &mut CartStore,
        analytics: &dyn AnalyticsSink,
    ) -> Result<Quantity, BrowseError> {
        if !product.in_stock {
            return Err(BrowseError::OutOfStock(product.id.clone()));
        }

        let quantity = self.quantity_for(&product.id);
        cart.add_item(product, quantity);
        self.added_at.insert(product.id.clone(), Instant::now());

        info!(product_id = %product.id, %quantity, "item added to cart");
        analytics.track(&AnalyticsEvent::ItemAddedToCart {
            product_id: product.id.to_string(),
            product_name: product.name.clone(),
            quantity: quantity.get(),
            unit_price: product.price.amount(),
        });

        Ok(quantity)
    }

    /// Whether the product was added within the last `window`.
    #[must_use]
    pub fn recently_added(&self, product_id: &ProductId, window: Duration) -> bool {
        self.added_at
            .get(product_id)
            .is_some_and(|at| at.elapsed() < window)
    }

    /// Drop acknowledgements older than `window`.
    pub fn expire_feedback(&mut self, window: Duration) {
        self.added_at.retain(|_, at| at.elapsed() < window);
    }
}

/// Report an explicit search submission.
///
/// Keystroke filtering does not go through here.
pub fn submit_search(filter: &ProductFilter, results_count: usize, analytics: &dyn AnalyticsSink) {
    let query = text::trim(&filter.query).to_owned();
    info!(%query, results_count, category = %filter.category, "search performed");
    analytics.track(&AnalyticsEvent::SearchPerformed {
        query,
        results_count,
        category: filter.category.to_string(),
    });
}
