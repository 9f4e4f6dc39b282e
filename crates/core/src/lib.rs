//! STEAM Tracker Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! product identifiers, prices, quantities, categories and email addresses.
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no HTTP, no session handling. This keeps it lightweight and allows the cart
//! and checkout logic to be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities, emails and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
