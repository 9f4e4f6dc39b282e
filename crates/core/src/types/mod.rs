//! Core types for STEAM Tracker.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod text;

pub use category::{Category, CategoryError, CategoryFilter};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use quantity::Quantity;
