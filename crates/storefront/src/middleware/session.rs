//! Session middleware configuration.
//!
//! Sets up cookie sessions using tower-sessions backed by a bounded `moka`
//! store. Records expire with the cookie and vanish on restart.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "steam_session";

/// Upper bound on stored session records.
const MAX_SESSION_RECORDS: u64 = 10_000;

/// Create the session layer with a bounded, expiring in-memory store.
///
/// Sessions expire after the same idle period as the shop session registry.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    let idle_seconds = i64::try_from(config.session_idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MokaStore::new(Some(MAX_SESSION_RECORDS)))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
