//! Orders

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::TypedId, money::Amount, restaurants::RestaurantId, wire::null_as_default};

pub mod status;

pub use status::*;

/// Order Id
pub type OrderId = TypedId<Order>;

/// Order Item Id
pub type OrderItemId = TypedId<OrderItem>;

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Paid through the external payment overlay.
    #[serde(rename = "RAZORPAY")]
    Online,

    /// Cash on delivery.
    #[serde(rename = "COD")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether the order must be settled through the payment overlay.
    #[must_use]
    pub const fn requires_gateway(self) -> bool {
        matches!(self, Self::Online)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "RAZORPAY",
            Self::CashOnDelivery => "COD",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "Online payment",
            Self::CashOnDelivery => "Cash on delivery",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method
#[derive(Debug, Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RAZORPAY" | "ONLINE" => Ok(Self::Online),
            "COD" | "CASH" => Ok(Self::CashOnDelivery),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Payment state reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Unknown(String),
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Completed is green, failed is red, everything else is still pending.
    #[must_use]
    pub const fn tone(&self) -> StatusTone {
        match self {
            Self::Completed => StatusTone::Green,
            Self::Failed => StatusTone::Red,
            Self::Pending | Self::Unknown(_) => StatusTone::Yellow,
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format_status_label(self.as_str())
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Order as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,

    /// Identifier used to correlate the order with the payment overlay.
    pub order_number: String,

    pub status: OrderStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtotal: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_fee: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_amount: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: Amount,
    pub delivery_address: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub special_instructions: Option<String>,
    pub estimated_delivery_time: Option<DateTime>,
    pub actual_delivery_time: Option<DateTime>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
    pub restaurant_phone: Option<String>,
    pub restaurant_image_url: Option<String>,
    pub delivery_partner_name: Option<String>,
    pub delivery_partner_phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_status_updates: Vec<StatusUpdate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_review: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_reviewed: bool,
}

impl Order {
    /// Whether the cancel action is offered.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// Whether the review action is offered.
    #[must_use]
    pub fn can_review(&self) -> bool {
        self.status == OrderStatus::Delivered && self.can_review && !self.has_reviewed
    }

    #[must_use]
    pub fn presentation(&self) -> StatusPresentation {
        self.status.presentation()
    }

    /// Sum of item quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.order_items.iter().map(|item| item.quantity).sum()
    }
}

/// Snapshot of a cart line frozen at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_price: Amount,
    pub item_name: Option<String>,
    pub special_instructions: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegetarian: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegan: bool,
}

/// One entry of an order's status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: Option<i64>,
    pub status: OrderStatus,
    pub description: Option<String>,
    pub estimated_time: Option<DateTime>,
    pub created_at: Option<DateTime>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ORDER: &str = r#"{
        "id": 42,
        "orderNumber": "ORD-20240101-0042",
        "status": "DELIVERED",
        "subtotal": 180.0,
        "deliveryFee": 30.0,
        "taxAmount": 9.0,
        "totalAmount": 219.0,
        "paymentMethod": "RAZORPAY",
        "paymentStatus": "COMPLETED",
        "createdAt": "2024-01-01T12:30:00",
        "orderItems": [
            {"id": 1, "quantity": 2, "price": 90.0, "totalPrice": 180.0, "itemName": "Paneer Tikka"}
        ],
        "deliveryStatusUpdates": [
            {"id": 7, "status": "PREPARING", "description": "Kitchen has started"}
        ],
        "canReview": true,
        "hasReviewed": false
    }"#;

    #[test]
    fn decodes_server_order() -> TestResult {
        let order: Order = serde_json::from_str(ORDER)?;

        assert_eq!(order.id, OrderId::new(42));
        assert_eq!(order.payment_method, Some(PaymentMethod::Online));
        assert_eq!(order.total_amount.to_string(), "₹219.00");
        assert_eq!(order.item_count(), 2);
        assert_eq!(
            order.delivery_status_updates.first().map(|update| &update.status),
            Some(&OrderStatus::Preparing)
        );

        Ok(())
    }

    #[test]
    fn review_is_offered_once_after_delivery() -> TestResult {
        let mut order: Order = serde_json::from_str(ORDER)?;

        assert!(order.can_review());

        order.has_reviewed = true;
        assert!(!order.can_review());

        order.has_reviewed = false;
        order.status = OrderStatus::OutForDelivery;
        assert!(!order.can_review());

        Ok(())
    }

    #[test]
    fn payment_status_tones() {
        assert_eq!(PaymentStatus::from("COMPLETED".to_string()).tone(), StatusTone::Green);
        assert_eq!(PaymentStatus::from("FAILED".to_string()).tone(), StatusTone::Red);
        assert_eq!(PaymentStatus::from("REFUNDED".to_string()).tone(), StatusTone::Yellow);
    }

    #[test]
    fn payment_method_parses_cli_spellings() -> TestResult {
        assert_eq!("cod".parse::<PaymentMethod>()?, PaymentMethod::CashOnDelivery);
        assert_eq!("online".parse::<PaymentMethod>()?, PaymentMethod::Online);
        assert!("cheque".parse::<PaymentMethod>().is_err());

        Ok(())
    }
}
