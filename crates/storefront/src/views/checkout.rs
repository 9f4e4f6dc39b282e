//! Checkout form, validation and simulated order placement.
//!
//! The flow has three phases. `Editing` accepts form submissions;
//! `Submitting` is entered after a valid submission and refuses further
//! submissions until the simulated order call finishes; `Completed` holds the
//! confirmation until the checkout page is next opened.

use std::time::Duration;

use chrono::{DateTime, Utc};
use steam_tracker_core::{Email, Price, text};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::CartStore;
use crate::services::analytics::{Analytics, AnalyticsEvent, AnalyticsSink};
use crate::session::ShopHandle;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";

/// Values entered in the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub subscribe: bool,
}

/// Inline, per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Why a submission did not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("checkout form has errors")]
    Invalid(FieldErrors),

    #[error("an order is already being placed")]
    AlreadySubmitting,

    #[error("cart is empty")]
    EmptyCart,

    #[error("order processing task failed")]
    Aborted,
}

/// Validate the form.
///
/// The name must be non-blank. The email must be non-blank and look like
/// `local@domain.tld`.
///
/// # Errors
///
/// Returns the messages for every failing field.
pub fn validate(form: &CheckoutForm) -> Result<Email, FieldErrors> {
    let mut errors = FieldErrors::default();

    if text::is_blank(&form.name) {
        errors.name = Some(NAME_REQUIRED.to_string());
    }

    let email = if text::is_blank(&form.email) {
        errors.email = Some(EMAIL_REQUIRED.to_string());
        None
    } else {
        match Email::parse(&form.email) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::debug!(error = %e, "email rejected");
                errors.email = Some(EMAIL_INVALID.to_string());
                None
            }
        }
    };

    match email {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(errors),
    }
}

/// Order details captured when a valid submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    name: String,
    email: Email,
    subscribe: bool,
    order_total: Price,
    line_count: usize,
    item_count: u64,
}

/// Shown to the customer once the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub name: String,
    pub email: Email,
    pub subscribe: bool,
    pub order_total: Price,
    pub line_count: usize,
    pub item_count: u64,
    pub placed_at: DateTime<Utc>,
}

/// Where the checkout flow is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Editing,
    Submitting,
    Completed(OrderConfirmation),
}

/// Per-session checkout page state.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    form: CheckoutForm,
    errors: FieldErrors,
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last submitted form values.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, CheckoutPhase::Submitting)
    }

    /// Start over with a blank form when the page is opened again.
    ///
    /// A submission in flight is left alone.
    pub fn reset(&mut self) {
        if !self.is_submitting() {
            *self = Self::default();
        }
    }

    /// Validate `form` and enter `Submitting`.
    ///
    /// # Errors
    ///
    /// - `SubmitError::AlreadySubmitting` while a previous submission is pending
    /// - `SubmitError::EmptyCart` when there is nothing to order
    /// - `SubmitError::Invalid` with the field messages; the phase is unchanged
    pub fn begin_submit(
        &mut self,
        form: CheckoutForm,
        cart: &CartStore,
    ) -> Result<PendingOrder, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::AlreadySubmitting);
        }
        if cart.is_empty() {
            return Err(SubmitError::EmptyCart);
        }

        self.form = form;
        match validate(&self.form) {
            Ok(email) => {
                self.errors = FieldErrors::default();
                self.phase = CheckoutPhase::Submitting;
                Ok(PendingOrder {
                    name: self.form.name.clone(),
                    email,
                    subscribe: self.form.subscribe,
                    order_total: cart.subtotal(),
                    line_count: cart.line_count(),
                    item_count: cart.item_count(),
                })
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Finish a pending order: report it, empty the cart and enter `Completed`.
    pub fn complete(
        &mut self,
        pending: PendingOrder,
        cart: &mut CartStore,
        analytics: &dyn AnalyticsSink,
    ) -> OrderConfirmation {
        analytics.track(&AnalyticsEvent::CheckoutCompleted {
            order_total: pending.order_total.amount(),
            item_count: pending.line_count,
            subscribe: pending.subscribe.to_string(),
        });
        cart.clear();

        let confirmation = OrderConfirmation {
            name: pending.name,
            email: pending.email,
            subscribe: pending.subscribe,
            order_total: pending.order_total,
            line_count: pending.line_count,
            item_count: pending.item_count,
            placed_at: Utc::now(),
        };
        info!(
            order_total = %confirmation.order_total,
            items = confirmation.item_count,
            "order placed"
        );
        self.phase = CheckoutPhase::Completed(confirmation.clone());
        confirmation
    }
}

/// Submit the checkout form for a session and wait for the simulated order
/// call to finish.
///
/// The session lock is released while the order is "in flight", so the page
/// can still be rendered (with the submit control disabled). Completion runs
/// on its own task and finishes even if the caller goes away.
///
/// # Errors
///
/// Returns the `SubmitError` from [`CheckoutFlow::begin_submit`], or
/// `SubmitError::Aborted` if the completion task panicked.
#[instrument(skip_all, fields(delay = ?delay))]
pub async fn place_order(
    shop: ShopHandle,
    form: CheckoutForm,
    analytics: Analytics,
    delay: Duration,
) -> Result<OrderConfirmation, SubmitError> {
    let pending = {
        let mut session = shop.lock().await;
        let session = &mut *session;
        session.checkout.begin_submit(form, &session.cart)?
    };

    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut session = shop.lock().await;
        let session = &mut *session;
        session
            .checkout
            .complete(pending, &mut session.cart, analytics.as_ref())
    });

    task.await.map_err(|e| {
        warn!(error = %e, "order completion task failed");
        SubmitError::Aborted
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use steam_tracker_core::{ProductId, Quantity};

    use super::*;
    use crate::catalog::Catalog;
    use crate::services::analytics::PageName;
    use crate::session::ShopSession;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<AnalyticsEvent>>);

    impl AnalyticsSink for Recorder {
        fn track(&self, event: &AnalyticsEvent) {
            self.0.lock().unwrap().push(event.clone());
        }

        fn page(&self, _name: &PageName) {}
    }

    fn form(name: &str, email: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            subscribe: false,
        }
    }

    fn cart_with(id: &str, quantity: u32) -> CartStore {
        let catalog = Catalog::standard();
        let mut cart = CartStore::new();
        cart.add_item(
            catalog.get(&ProductId::from(id)).unwrap(),
            Quantity::new(quantity).unwrap(),
        );
        cart
    }

    #[test]
    fn test_validate_reports_both_fields() {
        let errors = validate(&form("", "bad")).unwrap_err();
        assert_eq!(errors.name.as_deref(), Some(NAME_REQUIRED));
        assert_eq!(errors.email.as_deref(), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_validate_blank_fields() {
        let errors = validate(&form("   ", "  ")).unwrap_err();
        assert_eq!(errors.name.as_deref(), Some(NAME_REQUIRED));
        assert_eq!(errors.email.as_deref(), Some(EMAIL_REQUIRED));
    }

    #[test]
    fn test_validate_blank_uses_browser_whitespace() {
        let errors = validate(&form("\u{FEFF}", "ada@example.com")).unwrap_err();
        assert_eq!(errors.name.as_deref(), Some(NAME_REQUIRED));

        let email = validate(&form("\u{85}", "ada@example.com")).unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_validate_accepts_good_form() {
        let email = validate(&form("Ada", "ada@example.com")).unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_invalid_submit_keeps_editing_and_cart() {
        let mut flow = CheckoutFlow::new();
        let cart = cart_with("1", 2);

        let err = flow.begin_submit(form("", "bad"), &cart).unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(flow.phase(), &CheckoutPhase::Editing);
        assert_eq!(flow.errors().name.as_deref(), Some(NAME_REQUIRED));
        assert_eq!(flow.form().email, "bad");
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_empty_cart_cannot_submit() {
        let mut flow = CheckoutFlow::new();
        let err = flow
            .begin_submit(form("Ada", "ada@example.com"), &CartStore::new())
            .unwrap_err();
        assert_eq!(err, SubmitError::EmptyCart);
    }

    #[test]
    fn test_second_submit_refused_while_pending() {
        let mut flow = CheckoutFlow::new();
        let cart = cart_with("2", 1);

        flow.begin_submit(form("Ada", "ada@example.com"), &cart)
            .unwrap();
        assert!(flow.is_submitting());

        let err = flow
            .begin_submit(form("Ada", "ada@example.com"), &cart)
            .unwrap_err();
        assert_eq!(err, SubmitError::AlreadySubmitting);
    }

    #[test]
    fn test_complete_clears_cart_and_reports_snapshot() {
        let mut flow = CheckoutFlow::new();
        let mut cart = cart_with("1", 3);
        let recorder = Recorder::default();

        let mut submitted = form("Ada", "ada@example.com");
        submitted.subscribe = true;
        let pending = flow.begin_submit(submitted, &cart).unwrap();
        let confirmation = flow.complete(pending, &mut cart, &recorder);

        assert!(cart.is_empty());
        assert_eq!(confirmation.order_total.display(), "$74.97");
        assert_eq!(confirmation.item_count, 3);
        assert!(matches!(flow.phase(), CheckoutPhase::Completed(_)));

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            AnalyticsEvent::CheckoutCompleted {
                order_total: Price::from_cents(7497).amount(),
                item_count: 1,
                subscribe: "true".to_string(),
            }
        );
    }

    #[test]
    fn test_reset_after_completion_but_not_while_pending() {
        let mut flow = CheckoutFlow::new();
        let mut cart = cart_with("5", 1);

        let pending = flow
            .begin_submit(form("Ada", "ada@example.com"), &cart)
            .unwrap();
        flow.reset();
        assert!(flow.is_submitting());

        flow.complete(pending, &mut cart, &crate::services::analytics::NoopAnalytics);
        flow.reset();
        assert_eq!(flow.phase(), &CheckoutPhase::Editing);
        assert_eq!(flow.form(), &CheckoutForm::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_waits_for_delay() {
        let catalog = Catalog::standard();
        let shop = ShopHandle::default();
        shop.lock()
            .await
            .cart
            .add_one(catalog.get(&ProductId::from("2")).unwrap());

        let recorder = Arc::new(Recorder::default());
        let analytics: Analytics = recorder.clone();
        let delay = Duration::from_millis(1500);

        let order = tokio::spawn(place_order(
            shop.clone(),
            form("Ada", "ada@example.com"),
            analytics,
            delay,
        ));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        {
            let session: tokio::sync::MutexGuard<'_, ShopSession> = shop.lock().await;
            assert!(session.checkout.is_submitting());
            assert_eq!(session.cart.line_count(), 1);
        }
        assert!(recorder.0.lock().unwrap().is_empty());

        let confirmation = order.await.unwrap().unwrap();
        assert_eq!(confirmation.order_total.display(), "$49.99");

        let session = shop.lock().await;
        assert!(session.cart.is_empty());
        assert!(matches!(session.checkout.phase(), CheckoutPhase::Completed(_)));
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }
}
