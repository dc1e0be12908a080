//! Order status lifecycle and its presentation.
//!
//! The client never drives a transition. It maps whatever status string the
//! server reports onto an icon, a tone and a label, and decides whether the
//! customer may request a cancellation. The mapping is total over strings:
//! statuses added to the backend later fall through to the default entry.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Statuses for which the customer can no longer ask for a cancellation.
const NON_CANCELLABLE: [&str; 3] = ["DELIVERED", "CANCELLED", "OUT_FOR_DELIVERY"];

/// Label used when a status string has no printable content.
const UNKNOWN_LABEL: &str = "Unknown";

/// Server-reported order status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
    /// A status this client does not know about yet.
    Unknown(String),
}

impl OrderStatus {
    /// The known lifecycle, in display order.
    #[must_use]
    pub fn lifecycle() -> [Self; 7] {
        [
            Self::Pending,
            Self::Confirmed,
            Self::Preparing,
            Self::ReadyForPickup,
            Self::OutForDelivery,
            Self::Delivered,
            Self::Cancelled,
        ]
    }

    /// Parse a wire value; never fails.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "PREPARING" => Self::Preparing,
            "READY_FOR_PICKUP" => Self::ReadyForPickup,
            "OUT_FOR_DELIVERY" => Self::OutForDelivery,
            "DELIVERED" => Self::Delivered,
            "CANCELLED" => Self::Cancelled,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown(raw) => raw,
        }
    }

    /// `DELIVERED` and `CANCELLED` are final.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether a cancellation request may be offered for an order in this status.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        can_cancel(self.as_str())
    }

    /// Icon, tone and label for this status.
    #[must_use]
    pub fn presentation(&self) -> StatusPresentation {
        present_status(self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Unknown(_) => Self::Unknown(value),
            known => known,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Icon shown next to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    Clock,
    CheckCircle,
    ChefHat,
    Truck,
    Cross,
}

impl StatusIcon {
    /// Short glyph for text front ends.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Clock => "◷",
            Self::CheckCircle => "✔",
            Self::ChefHat => "♨",
            Self::Truck => "⛟",
            Self::Cross => "✘",
        }
    }
}

/// Color family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Yellow,
    Blue,
    Orange,
    Green,
    Purple,
    Red,
    Gray,
}

impl StatusTone {
    /// Badge class names for HTML front ends.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Yellow => "bg-yellow-100 text-yellow-800",
            Self::Blue => "bg-blue-100 text-blue-800",
            Self::Orange => "bg-orange-100 text-orange-800",
            Self::Green => "bg-green-100 text-green-800",
            Self::Purple => "bg-purple-100 text-purple-800",
            Self::Red => "bg-red-100 text-red-800",
            Self::Gray => "bg-gray-100 text-gray-800",
        }
    }
}

/// Everything a view needs to render a status badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPresentation {
    pub icon: StatusIcon,
    pub tone: StatusTone,
    pub label: String,
}

#[derive(Debug, Clone, Copy)]
struct StatusStyle {
    icon: StatusIcon,
    tone: StatusTone,
}

const DEFAULT_STYLE: StatusStyle = StatusStyle {
    icon: StatusIcon::Clock,
    tone: StatusTone::Gray,
};

const STATUS_STYLES: [(&str, StatusStyle); 7] = [
    (
        "PENDING",
        StatusStyle {
            icon: StatusIcon::Clock,
            tone: StatusTone::Yellow,
        },
    ),
    (
        "CONFIRMED",
        StatusStyle {
            icon: StatusIcon::CheckCircle,
            tone: StatusTone::Blue,
        },
    ),
    (
        "PREPARING",
        StatusStyle {
            icon: StatusIcon::ChefHat,
            tone: StatusTone::Orange,
        },
    ),
    (
        "READY_FOR_PICKUP",
        StatusStyle {
            icon: StatusIcon::CheckCircle,
            tone: StatusTone::Green,
        },
    ),
    (
        "OUT_FOR_DELIVERY",
        StatusStyle {
            icon: StatusIcon::Truck,
            tone: StatusTone::Purple,
        },
    ),
    (
        "DELIVERED",
        StatusStyle {
            icon: StatusIcon::CheckCircle,
            tone: StatusTone::Green,
        },
    ),
    (
        "CANCELLED",
        StatusStyle {
            icon: StatusIcon::Cross,
            tone: StatusTone::Red,
        },
    ),
];

/// Map any status string onto its presentation.
#[must_use]
pub fn present_status(raw: &str) -> StatusPresentation {
    let style = STATUS_STYLES
        .iter()
        .find(|(status, _)| *status == raw)
        .map_or(DEFAULT_STYLE, |(_, style)| *style);

    StatusPresentation {
        icon: style.icon,
        tone: style.tone,
        label: format_status_label(raw),
    }
}

/// `READY_FOR_PICKUP` becomes `Ready For Pickup`.
///
/// Never returns an empty string.
#[must_use]
pub fn format_status_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    let mut previous_is_word = false;

    for ch in raw.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_alphanumeric();

        if is_word && !previous_is_word {
            label.extend(ch.to_uppercase());
        } else {
            label.extend(ch.to_lowercase());
        }

        previous_is_word = is_word;
    }

    if label.trim().is_empty() {
        return UNKNOWN_LABEL.to_string();
    }

    label
}

/// Whether an order in `raw` status may still be cancelled by the customer.
#[must_use]
pub fn can_cancel(raw: &str) -> bool {
    !NON_CANCELLABLE.contains(&raw)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn known_statuses_have_title_case_labels() {
        for status in OrderStatus::lifecycle() {
            let label = status.presentation().label;

            assert!(!label.contains('_'), "label {label:?} still has underscores");
            assert!(
                label
                    .split(' ')
                    .all(|word| word.chars().next().is_some_and(char::is_uppercase)),
                "label {label:?} is not title case"
            );
        }

        assert_eq!(format_status_label("READY_FOR_PICKUP"), "Ready For Pickup");
        assert_eq!(format_status_label("OUT_FOR_DELIVERY"), "Out For Delivery");
        assert_eq!(format_status_label("PENDING"), "Pending");
    }

    #[test]
    fn unknown_status_uses_default_style() {
        let presentation = present_status("AWAITING_DRIVER");

        assert_eq!(presentation.icon, StatusIcon::Clock);
        assert_eq!(presentation.tone, StatusTone::Gray);
        assert_eq!(presentation.label, "Awaiting Driver");
    }

    #[test]
    fn non_ascii_statuses_are_title_cased() {
        assert_eq!(format_status_label("ÉTAT_EN_COURS"), "État En Cours");
        assert_eq!(format_status_label("über_fällig"), "Über Fällig");
    }

    #[test]
    fn empty_status_still_renders() {
        assert_eq!(present_status("").label, "Unknown");
        assert_eq!(present_status("__").label, "Unknown");
    }

    #[test]
    fn cancellation_is_refused_only_late_in_the_lifecycle() {
        let lifecycle = OrderStatus::lifecycle();

        let refused: Vec<&str> = lifecycle
            .iter()
            .filter(|status| !status.can_cancel())
            .map(OrderStatus::as_str)
            .collect();

        assert_eq!(refused, ["OUT_FOR_DELIVERY", "DELIVERED", "CANCELLED"]);
        assert!(can_cancel("SOMETHING_NEW"));
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        let terminal: Vec<OrderStatus> = OrderStatus::lifecycle()
            .into_iter()
            .filter(OrderStatus::is_terminal)
            .collect();

        assert_eq!(terminal, [OrderStatus::Delivered, OrderStatus::Cancelled]);
    }

    #[test]
    fn unknown_wire_values_survive_round_trip() -> TestResult {
        let status: OrderStatus = serde_json::from_str("\"ON_HOLD\"")?;

        assert_eq!(status, OrderStatus::Unknown("ON_HOLD".to_string()));
        assert_eq!(serde_json::to_string(&status)?, "\"ON_HOLD\"");

        Ok(())
    }
}
