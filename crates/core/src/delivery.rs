//! Delivery partner vocabulary.
//!
//! The delivery service is a separate backend with string order ids and a
//! shorter status chain. Partners accept or reject pending orders and then
//! advance accepted ones one step at a time.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{
    forms::FieldErrors, ids::TypedId, orders::StatusTone, reviews::Stars, wire::null_as_default,
};

/// Partner Id
pub type PartnerId = TypedId<PartnerProfile>;

/// Order id issued by the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryOrderId(String);

impl DeliveryOrderId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeliveryOrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DeliveryOrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for DeliveryOrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Delivery status as tracked by the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryStatus {
    Pending,
    Accepted,
    PickedUp,
    Delivered,
    Unknown(String),
}

impl DeliveryStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::PickedUp => "PICKED_UP",
            Self::Delivered => "DELIVERED",
            Self::Unknown(raw) => raw,
        }
    }

    /// The status a partner may advance to, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Accepted => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::Delivered),
            Self::Pending | Self::Delivered | Self::Unknown(_) => None,
        }
    }

    /// Button text for advancing out of this status.
    #[must_use]
    pub const fn action_label(&self) -> Option<&'static str> {
        match self {
            Self::Accepted => Some("Mark as Picked Up"),
            Self::PickedUp => Some("Mark as Delivered"),
            Self::Pending | Self::Delivered | Self::Unknown(_) => None,
        }
    }

    #[must_use]
    pub const fn tone(&self) -> StatusTone {
        match self {
            Self::Pending => StatusTone::Yellow,
            Self::Accepted => StatusTone::Blue,
            Self::PickedUp => StatusTone::Purple,
            Self::Delivered => StatusTone::Green,
            Self::Unknown(_) => StatusTone::Gray,
        }
    }
}

impl From<String> for DeliveryStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "ACCEPTED" => Self::Accepted,
            "PICKED_UP" => Self::PickedUp,
            "DELIVERED" => Self::Delivered,
            _ => Self::Unknown(value),
        }
    }
}

impl From<DeliveryStatus> for String {
    fn from(value: DeliveryStatus) -> Self {
        match value {
            DeliveryStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Order as seen by a delivery partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: DeliveryOrderId,
    pub customer_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
    pub timestamp: Option<String>,
    pub delivery_partner_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub customer_phone: Option<String>,
    pub status: Option<DeliveryStatus>,
}

impl DeliveryOrder {
    #[must_use]
    pub fn status(&self) -> DeliveryStatus {
        self.status.clone().unwrap_or(DeliveryStatus::Pending)
    }
}

/// Body of `POST /api/orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub status: DeliveryStatus,
}

/// Partner profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub vehicle_number: Option<String>,
    #[serde(default, skip_serializing, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, skip_serializing, deserialize_with = "null_as_default")]
    pub is_available: bool,
}

/// Availability flag, in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_available: bool,
}

/// Feedback a partner leaves about a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    pub order_id: String,
    pub rating: u8,
    pub comments: String,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            order_id: String::new(),
            rating: 5,
            comments: String::new(),
        }
    }
}

impl FeedbackForm {
    /// Check the form and build the feedback body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<PartnerFeedback, FieldErrors> {
        let mut errors = FieldErrors::new();

        let order_id = self.order_id.trim();

        if order_id.is_empty() {
            errors.push("orderId", "Order ID is required.");
        }

        let rating = Stars::new(self.rating);

        if rating.is_none() {
            errors.push("rating", "Rating must be between 1 and 5.");
        }

        match rating {
            Some(rating) if errors.is_empty() => Ok(PartnerFeedback {
                order_id: DeliveryOrderId::from(order_id),
                rating,
                comments: self.comments.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerFeedback {
    pub order_id: DeliveryOrderId,
    pub rating: Stars,
    pub comments: String,
}
