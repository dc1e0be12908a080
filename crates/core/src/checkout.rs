//! Checkout
//!
//! Two pieces live here: the delivery form with its local validation, and
//! the submission state machine that guards against duplicate orders.
//!
//! ```text
//! Collecting ──submit──▶ Submitting ──COD──────────────────▶ Completed
//!     ▲                      │  └──online──▶ PaymentPending ──paid──▶ Completed
//!     └────────failed────────┘                    │
//!     └───────────────────dismissed───────────────┘
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::{
    forms::FieldErrors,
    orders::{OrderId, PaymentMethod},
};

/// Longest delivery address the backend accepts.
pub const MAX_ADDRESS_CHARS: usize = 1000;

static PHONE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]{10,15}$"));

/// Delivery details as typed by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub delivery_address: String,
    pub customer_phone: String,
    pub payment_method: Option<PaymentMethod>,
    pub special_instructions: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            delivery_address: String::new(),
            customer_phone: String::new(),
            payment_method: Some(PaymentMethod::Online),
            special_instructions: String::new(),
        }
    }
}

impl CheckoutForm {
    /// Check the form and build the order-creation body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<OrderRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let address = self.delivery_address.trim();

        if address.is_empty() {
            errors.push("deliveryAddress", "Delivery address is required");
        } else if address.chars().count() > MAX_ADDRESS_CHARS {
            errors.push(
                "deliveryAddress",
                "Delivery address must not exceed 1000 characters",
            );
        }

        let phone: String = self
            .customer_phone
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();

        if phone.is_empty() {
            errors.push("customerPhone", "Phone number is required");
        } else if !is_valid_phone(&phone) {
            errors.push("customerPhone", "Please enter a valid phone number");
        }

        let Some(payment_method) = self.payment_method else {
            errors.push("paymentMethod", "Please select a payment method");
            return Err(errors);
        };

        let instructions = self.special_instructions.trim();

        errors.into_result(OrderRequest {
            delivery_address: address.to_string(),
            customer_phone: phone,
            payment_method,
            special_instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
        })
    }
}

fn is_valid_phone(phone: &str) -> bool {
    PHONE
        .as_ref()
        .is_ok_and(|pattern| pattern.is_match(phone))
}

/// Body of the order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub delivery_address: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Where the checkout submission currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Editing the form. The only state that accepts a submission.
    #[default]
    Collecting,

    /// The order-creation request is in flight.
    Submitting,

    /// The order exists and the payment overlay is open.
    PaymentPending {
        order_id: OrderId,
        order_number: String,
    },

    /// The order is placed; the view moves on to the order detail.
    Completed { order_id: OrderId },
}

/// Transition refused by the checkout state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("a checkout submission is already in progress")]
    AlreadySubmitting,

    #[error("no order creation is in flight")]
    NotSubmitting,

    #[error("no payment is pending")]
    NoPaymentPending,
}

impl CheckoutState {
    /// Whether the submit action is available.
    #[must_use]
    pub const fn accepts_submission(&self) -> bool {
        matches!(self, Self::Collecting)
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting | Self::PaymentPending { .. })
    }

    /// Collecting to Submitting.
    ///
    /// # Errors
    ///
    /// Refused from every other state.
    pub fn begin_submission(&mut self) -> Result<(), CheckoutError> {
        if !self.accepts_submission() {
            return Err(CheckoutError::AlreadySubmitting);
        }

        *self = Self::Submitting;

        Ok(())
    }

    /// The server created the order.
    ///
    /// # Errors
    ///
    /// Refused unless a submission is in flight.
    pub fn order_created(
        &mut self,
        order_id: OrderId,
        order_number: String,
        payment_method: PaymentMethod,
    ) -> Result<(), CheckoutError> {
        if *self != Self::Submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        *self = if payment_method.requires_gateway() {
            Self::PaymentPending {
                order_id,
                order_number,
            }
        } else {
            Self::Completed { order_id }
        };

        Ok(())
    }

    /// Order creation failed; the form is editable again.
    ///
    /// # Errors
    ///
    /// Refused unless a submission is in flight.
    pub fn submission_failed(&mut self) -> Result<(), CheckoutError> {
        if *self != Self::Submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        *self = Self::Collecting;

        Ok(())
    }

    /// The gateway reported a payment. The order is complete whether or not
    /// marking it paid succeeds afterwards.
    ///
    /// # Errors
    ///
    /// Refused unless a payment is pending.
    pub fn payment_settled(&mut self) -> Result<OrderId, CheckoutError> {
        let Self::PaymentPending { order_id, .. } = *self else {
            return Err(CheckoutError::NoPaymentPending);
        };

        *self = Self::Completed { order_id };

        Ok(order_id)
    }

    /// The overlay was dismissed or failed to load.
    ///
    /// # Errors
    ///
    /// Refused unless a payment is pending.
    pub fn payment_abandoned(&mut self) -> Result<(), CheckoutError> {
        if !matches!(self, Self::PaymentPending { .. }) {
            return Err(CheckoutError::NoPaymentPending);
        }

        *self = Self::Collecting;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            delivery_address: " 12 MG Road, Bengaluru ".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            payment_method: Some(PaymentMethod::CashOnDelivery),
            special_instructions: "  ".to_string(),
        }
    }

    #[test]
    fn valid_form_builds_trimmed_request() -> TestResult {
        let request = filled_form().validate().map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(request.delivery_address, "12 MG Road, Bengaluru");
        assert_eq!(request.customer_phone, "+919876543210");
        assert_eq!(request.special_instructions, None);

        Ok(())
    }

    #[test]
    fn each_invalid_field_gets_its_own_message() {
        let form = CheckoutForm {
            delivery_address: "   ".to_string(),
            customer_phone: "12345".to_string(),
            payment_method: None,
            special_instructions: String::new(),
        };

        let Err(errors) = form.validate() else {
            unreachable!("form is invalid");
        };

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("deliveryAddress"), Some("Delivery address is required"));
        assert_eq!(errors.get("customerPhone"), Some("Please enter a valid phone number"));
        assert_eq!(errors.get("paymentMethod"), Some("Please select a payment method"));
    }

    #[test]
    fn blank_phone_is_required_not_invalid() {
        let form = CheckoutForm {
            customer_phone: " ".to_string(),
            ..filled_form()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert_eq!(errors.get("customerPhone"), Some("Phone number is required"));
    }

    #[test]
    fn phone_pattern_bounds() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+123456789012345"));
        assert!(!is_valid_phone("+1234567890123456"));
        assert!(!is_valid_phone("98765-43210"));
    }

    #[test]
    fn second_submission_is_refused() -> TestResult {
        let mut state = CheckoutState::default();

        state.begin_submission()?;

        assert_eq!(state.begin_submission(), Err(CheckoutError::AlreadySubmitting));
        assert_eq!(state, CheckoutState::Submitting);

        Ok(())
    }

    #[test]
    fn cash_on_delivery_skips_payment() -> TestResult {
        let mut state = CheckoutState::default();

        state.begin_submission()?;
        state.order_created(OrderId::new(5), "ORD-5".to_string(), PaymentMethod::CashOnDelivery)?;

        assert_eq!(state, CheckoutState::Completed { order_id: OrderId::new(5) });

        Ok(())
    }

    #[test]
    fn online_payment_waits_for_gateway() -> TestResult {
        let mut state = CheckoutState::default();

        state.begin_submission()?;
        state.order_created(OrderId::new(6), "ORD-6".to_string(), PaymentMethod::Online)?;

        assert!(state.is_busy());
        assert_eq!(state.payment_settled()?, OrderId::new(6));
        assert_eq!(state, CheckoutState::Completed { order_id: OrderId::new(6) });

        Ok(())
    }

    #[test]
    fn dismissing_the_overlay_reopens_the_form() -> TestResult {
        let mut state = CheckoutState::PaymentPending {
            order_id: OrderId::new(7),
            order_number: "ORD-7".to_string(),
        };

        state.payment_abandoned()?;

        assert!(state.accepts_submission());
        assert_eq!(state.payment_abandoned(), Err(CheckoutError::NoPaymentPending));

        Ok(())
    }

    #[test]
    fn failed_creation_returns_to_collecting() -> TestResult {
        let mut state = CheckoutState::default();

        assert_eq!(state.submission_failed(), Err(CheckoutError::NotSubmitting));

        state.begin_submission()?;
        state.submission_failed()?;

        assert_eq!(state, CheckoutState::Collecting);

        Ok(())
    }
}
