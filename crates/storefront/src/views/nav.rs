//! Navigation shell: cart badge and active link.

use crate::cart::CartStore;

/// Top-level navigation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Browse,
    Checkout,
}

impl NavLink {
    /// The link matching a request path, if any.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Browse),
            "/checkout" => Some(Self::Checkout),
            _ => None,
        }
    }
}

/// Data for the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavView {
    pub item_count: u64,
    pub active: Option<NavLink>,
}

impl NavView {
    #[must_use]
    pub fn new(cart: &CartStore, path: &str) -> Self {
        Self {
            item_count: cart.item_count(),
            active: NavLink::for_path(path),
        }
    }

    /// Whether the cart badge is shown.
    #[must_use]
    pub const fn show_badge(&self) -> bool {
        self.item_count > 0
    }

    #[must_use]
    pub fn is_browse(&self) -> bool {
        self.active == Some(NavLink::Browse)
    }

    #[must_use]
    pub fn is_checkout(&self) -> bool {
        self.active == Some(NavLink::Checkout)
    }
}
