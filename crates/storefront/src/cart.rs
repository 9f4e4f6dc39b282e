//! Session cart store.
//!
//! Holds the ordered cart entries for one shopping session. Subtotal and item
//! count are derived from the entries on every read and never stored.
//!
//! Entries keep the product snapshot taken when the product was first added;
//! later adds only bump the quantity.

use serde::Serialize;
use steam_tracker_core::{Price, ProductId, Quantity};
use tracing::debug;

use crate::catalog::Product;

/// One product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: Quantity,
}

impl CartEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// The cart for a single session.
///
/// At most one entry exists per product ID. Insertion order is preserved for
/// display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartStore {
    entries: Vec<CartEntry>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `quantity` of `product`.
    ///
    /// If the product is already in the cart its quantity grows; otherwise a
    /// new entry is appended. Stock is not checked here.
    pub fn add_item(&mut self, product: &Product, quantity: Quantity) {
        if let Some(entry) = self.entry_mut(&product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            debug!(product_id = %product.id, quantity = %entry.quantity, "cart entry incremented");
            return;
        }

        self.entries.push(CartEntry {
            product: product.clone(),
            quantity,
        });
        debug!(product_id = %product.id, %quantity, "cart entry added");
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) {
        self.add_item(product, Quantity::ONE);
    }

    /// Remove the entry for `product_id`. Does nothing if it is absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product.id != product_id);
        if self.entries.len() != before {
            debug!(%product_id, "cart entry removed");
        }
    }

    /// Set the quantity of an existing entry.
    ///
    /// A quantity below 1 removes the entry. An absent product is left absent.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let Some(quantity) = Quantity::from_signed(quantity) else {
            self.remove_item(product_id);
            return;
        };

        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = quantity;
            debug!(%product_id, %quantity, "cart entry quantity set");
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
        debug!("cart cleared");
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The entry for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of `price × quantity` over all entries.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.quantity.get()))
            .sum()
    }

    fn entry_mut(&mut self, product_id: &ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| &e.product.id == product_id)
    }
}
