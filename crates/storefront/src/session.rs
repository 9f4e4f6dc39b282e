//! Per-browser shopping sessions.
//!
//! The session cookie (tower-sessions, `moka` store) carries only a random
//! shop ID. The cart and page state for that ID live in a `moka` cache that
//! forgets sessions after a period of inactivity. Nothing is persisted; a
//! restart starts every visitor with an empty cart.
//!
//! A shop ID is only handed out on the first write ([`CurrentShop`]). Pages
//! and fragments that merely read use [`ExistingShop`], so cookieless
//! traffic never takes a registry slot.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use moka::future::Cache;
use tokio::sync::{Mutex, MutexGuard};
use tower_sessions::Session;
use uuid::Uuid;

use crate::cart::CartStore;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::browse::BrowseState;
use crate::views::checkout::CheckoutFlow;

/// Upper bound on concurrently tracked sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Session keys.
pub mod keys {
    /// Key for the shop ID that indexes the session registry.
    pub const SHOP_ID: &str = "shop_id";
}

/// Everything one visitor is doing.
#[derive(Debug, Default)]
pub struct ShopSession {
    pub cart: CartStore,
    pub browse: BrowseState,
    pub checkout: CheckoutFlow,
}

/// Shared handle to one visitor's [`ShopSession`].
///
/// Every consumer of the cart receives this handle explicitly; there is no
/// global cart.
#[derive(Debug, Clone, Default)]
pub struct ShopHandle(Arc<Mutex<ShopSession>>);

impl ShopHandle {
    #[must_use]
    pub fn new(session: ShopSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Lock the session for reading or mutation.
    pub async fn lock(&self) -> MutexGuard<'_, ShopSession> {
        self.0.lock().await
    }
}

/// All live shopping sessions, keyed by shop ID.
#[derive(Clone)]
pub struct SessionRegistry {
    cache: Cache<Uuid, ShopHandle>,
}

impl SessionRegistry {
    /// Create a registry that drops sessions idle for longer than `idle`.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }

    /// The session for `id`, creating an empty one if needed.
    pub async fn get_or_create(&self, id: Uuid) -> ShopHandle {
        self.cache.get_with(id, async { ShopHandle::default() }).await
    }

    /// The session for `id`, if it is still alive.
    pub async fn get(&self, id: &Uuid) -> Option<ShopHandle> {
        self.cache.get(id).await
    }
}

fn request_session(parts: &Parts) -> Result<Session, AppError> {
    parts.extensions.get::<Session>().cloned().ok_or_else(|| {
        AppError::Internal("cart accessed outside of a shopping session".to_string())
    })
}

/// Extractor for the current visitor's shop session, creating it if needed.
///
/// For handlers that change the cart or page state. Requires the session
/// layer; using it on a route without that layer is a wiring bug and yields
/// an internal error.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentShop(shop): CurrentShop) -> String {
///     let session = shop.lock().await;
///     format!("{} items", session.cart.item_count())
/// }
/// ```
pub struct CurrentShop(pub ShopHandle);

impl FromRequestParts<AppState> for CurrentShop {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = request_session(parts)?;

        let shop_id = if let Some(id) = session.get::<Uuid>(keys::SHOP_ID).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(keys::SHOP_ID, id).await?;
            tracing::debug!(shop_id = %id, "new shopping session");
            id
        };

        Ok(Self(state.sessions().get_or_create(shop_id).await))
    }
}

/// Extractor for read-only handlers.
///
/// Yields the visitor's live shop session, or a detached empty one when the
/// visitor has none yet (or it expired). Never writes the cookie session or
/// the registry; changes made through a detached handle are discarded.
pub struct ExistingShop(pub ShopHandle);

impl FromRequestParts<AppState> for ExistingShop {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = request_session(parts)?;

        let live = match session.get::<Uuid>(keys::SHOP_ID).await? {
            Some(id) => state.sessions().get(&id).await,
            None => None,
        };

        Ok(Self(live.unwrap_or_default()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use steam_tracker_core::ProductId;

    use super::*;
    use crate::catalog::Catalog;

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        let catalog = Catalog::standard();

        let first = registry.get_or_create(id).await;
        first
            .lock()
            .await
            .cart
            .add_one(catalog.get(&ProductId::from("1")).unwrap());

        let again = registry.get_or_create(id).await;
        assert_eq!(again.lock().await.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let catalog = Catalog::standard();

        let a = registry.get_or_create(Uuid::new_v4()).await;
        let b = registry.get_or_create(Uuid::new_v4()).await;
        a.lock()
            .await
            .cart
            .add_one(catalog.get(&ProductId::from("2")).unwrap());

        assert!(b.lock().await.cart.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        assert!(registry.get(&Uuid::new_v4()).await.is_none());
    }
}
