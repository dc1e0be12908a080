//! Checkout flow.
//!
//! Drives [`CheckoutState`] through order creation and, for online payment,
//! the external payment overlay. The state lock is only ever held between
//! awaits, never across one.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use parking_lot::Mutex;
use platter::{
    cart::Cart,
    cart_count::CartCountStore,
    checkout::{CheckoutError, CheckoutForm, CheckoutState},
    forms::FieldErrors,
    money::currency_code,
    orders::{Order, OrderId},
    routes::Route,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    errors::{ApiError, Notice},
    services::{CartService, OrdersService},
    session::SessionStore,
    views::ViewLifetime,
};

const ORDER_FAILED: &str = "Failed to place order. Please try again.";
const MARK_PAID_FAILED: &str =
    "Payment successful but there was an error updating the order. Please contact support.";
const GATEWAY_FAILED: &str = "Payment gateway failed to load. Please check your internet connection.";

/// What the payment overlay is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor units of `currency`.
    pub amount_minor: i64,
    pub currency: &'static str,
    /// Correlates the payment with the order.
    pub order_number: String,
    pub description: String,
    pub customer_name: Option<String>,
    pub customer_phone: String,
}

/// How the overlay was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed { payment_id: String },
    Dismissed,
}

#[derive(Debug, Error)]
#[error("payment gateway unavailable: {reason}")]
pub struct GatewayError {
    pub reason: String,
}

/// The external payment overlay.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Show the overlay and wait until it is closed.
    async fn collect(&self, request: PaymentRequest) -> Result<PaymentOutcome, GatewayError>;
}

/// Result of a submission that got past local checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The order is placed. `notice` carries a problem worth showing even
    /// so, such as a payment that could not be recorded.
    Completed {
        order_id: OrderId,
        notice: Option<Notice>,
    },

    /// The overlay was dismissed; the form is editable again.
    Abandoned,
}

impl CheckoutOutcome {
    /// Where the view goes next.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Completed { order_id, .. } => Route::Order(*order_id),
            Self::Abandoned => Route::Checkout,
        }
    }
}

/// Submission refused or failed.
#[derive(Debug, Error)]
pub enum CheckoutFlowError {
    #[error("the form has invalid fields")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Refused(#[from] CheckoutError),

    #[error("failed to place the order")]
    OrderFailed(#[source] ApiError),

    #[error("payment could not be started")]
    Gateway(#[source] GatewayError),

    #[error("order total cannot be charged")]
    Amount,

    #[error("the checkout view was closed")]
    Closed,
}

impl CheckoutFlowError {
    /// What to show, if anything. A refused duplicate submit is silent.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Invalid(errors) => Some(Notice::Inline(errors.clone())),
            Self::OrderFailed(source) => Some(Notice::for_mutation(source, ORDER_FAILED)),
            Self::Gateway(_) => Some(Notice::Alert(GATEWAY_FAILED.to_string())),
            Self::Amount => Some(Notice::Alert(ORDER_FAILED.to_string())),
            Self::Refused(_) | Self::Closed => None,
        }
    }
}

/// Checkout screen: order summary, delivery form and the submit action.
pub struct CheckoutFlow {
    cart: Arc<dyn CartService>,
    orders: Arc<dyn OrdersService>,
    gateway: Arc<dyn PaymentGateway>,
    session: Arc<dyn SessionStore>,
    count: CartCountStore,
    state: Mutex<CheckoutState>,
    lifetime: ViewLifetime,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(
        cart: Arc<dyn CartService>,
        orders: Arc<dyn OrdersService>,
        gateway: Arc<dyn PaymentGateway>,
        session: Arc<dyn SessionStore>,
        count: CartCountStore,
    ) -> Self {
        Self {
            cart,
            orders,
            gateway,
            session,
            count,
            state: Mutex::new(CheckoutState::default()),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state.lock().clone()
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Cart shown in the order summary. An empty cart, or one below the
    /// restaurant's minimum, sends the customer back to the cart.
    ///
    /// # Errors
    ///
    /// Returns where to go instead.
    pub async fn prepare(&self) -> Result<Cart, Notice> {
        let cart = self
            .cart
            .get_cart()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch cart"))?;

        if cart.is_empty() || !cart.checkout_gate().is_open() {
            return Err(Notice::Redirect(Route::Cart));
        }

        self.count.publish_cart(&cart);

        Ok(cart)
    }

    /// Validate the form, place the order and collect payment if needed.
    ///
    /// Only one submission runs at a time; further calls while one is in
    /// flight are refused without a request.
    ///
    /// # Errors
    ///
    /// Returns why no order was completed.
    pub async fn submit(&self, form: &CheckoutForm) -> Result<CheckoutOutcome, CheckoutFlowError> {
        let request = form.validate().map_err(CheckoutFlowError::Invalid)?;

        self.state.lock().begin_submission()?;

        let payment_method = request.payment_method;
        let customer_phone = request.customer_phone.clone();

        let order = match self.orders.create_order(request).await {
            Ok(order) => order,
            Err(error) => {
                warn!(%error, "order creation failed");
                self.state.lock().submission_failed()?;

                return Err(CheckoutFlowError::OrderFailed(error));
            }
        };

        info!(order = %order.order_number, method = %payment_method, "order created");

        self.state
            .lock()
            .order_created(order.id, order.order_number.clone(), payment_method)?;

        if !payment_method.requires_gateway() {
            return self.complete(order.id, None);
        }

        self.collect_payment(&order, customer_phone).await
    }

    async fn collect_payment(
        &self,
        order: &Order,
        customer_phone: String,
    ) -> Result<CheckoutOutcome, CheckoutFlowError> {
        let Some(amount_minor) = order.total_amount.to_minor_units() else {
            self.state.lock().payment_abandoned()?;

            return Err(CheckoutFlowError::Amount);
        };

        let customer_name = self
            .session
            .load()
            .ok()
            .flatten()
            .map(|session| session.display_name().to_string());

        let request = PaymentRequest {
            amount_minor,
            currency: currency_code(),
            order_number: order.order_number.clone(),
            description: format!("Order #{}", order.order_number),
            customer_name,
            customer_phone,
        };

        let payment_id = match self.gateway.collect(request).await {
            Ok(PaymentOutcome::Completed { payment_id }) => payment_id,
            Ok(PaymentOutcome::Dismissed) => {
                self.state.lock().payment_abandoned()?;

                return Ok(CheckoutOutcome::Abandoned);
            }
            Err(error) => {
                warn!(%error, "payment gateway failed");
                self.state.lock().payment_abandoned()?;

                return Err(CheckoutFlowError::Gateway(error));
            }
        };

        let order_id = self.state.lock().payment_settled()?;

        let notice = match self
            .orders
            .mark_paid(order.order_number.clone(), payment_id)
            .await
        {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, order = %order.order_number, "could not record payment");

                Some(Notice::Alert(MARK_PAID_FAILED.to_string()))
            }
        };

        self.complete(order_id, notice)
    }

    fn complete(
        &self,
        order_id: OrderId,
        notice: Option<Notice>,
    ) -> Result<CheckoutOutcome, CheckoutFlowError> {
        self.count.reset();

        self.lifetime
            .keep(CheckoutOutcome::Completed { order_id, notice })
            .ok_or(CheckoutFlowError::Closed)
    }
}
