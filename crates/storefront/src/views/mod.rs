//! Page state for the storefront's views.
//!
//! Each view owns the transient UI state of one page. The cart itself lives
//! in [`crate::cart`]; views receive it by reference.

pub mod browse;
pub mod checkout;
pub mod nav;
