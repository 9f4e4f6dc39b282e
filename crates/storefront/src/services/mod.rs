//! Services the storefront reports to.
//!
//! - `analytics` - Event and page-name tracking behind a pluggable sink

pub mod analytics;
