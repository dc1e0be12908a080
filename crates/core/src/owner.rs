//! Restaurant owner vocabulary.
//!
//! Owners edit one restaurant and its menu, and accept or reject orders
//! that are still pending. The forms here hold raw input and validate it
//! into the bodies the backend expects.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::civil::Time;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    forms::FieldErrors,
    money::Amount,
    orders::{OrderId, OrderStatus},
    restaurants::{MenuItem, RestaurantId},
    wire::null_as_default,
};

/// Restaurant as its owner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedRestaurant {
    pub id: RestaurantId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
}

impl OwnedRestaurant {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed restaurant")
    }

    /// A form pre-filled with the stored values.
    #[must_use]
    pub fn to_form(&self) -> RestaurantForm {
        RestaurantForm {
            name: self.name.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            contact: self.contact.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            opening_time: self.opening_time.map(format_time).unwrap_or_default(),
            closing_time: self.closing_time.map(format_time).unwrap_or_default(),
        }
    }
}

fn format_time(time: Time) -> String {
    time.strftime("%H:%M").to_string()
}

/// Restaurant details as typed by the owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantForm {
    pub name: String,
    pub location: String,
    pub contact: String,
    pub description: String,
    /// `HH:MM`, or blank.
    pub opening_time: String,
    /// `HH:MM`, or blank.
    pub closing_time: String,
}

impl RestaurantForm {
    /// Check the form and build the create/update body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<RestaurantDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name, "Restaurant name is required");
        let location = required(&mut errors, "location", &self.location, "Location is required");
        let contact = required(&mut errors, "contact", &self.contact, "Contact is required");

        let opening_time = optional_time(
            &mut errors,
            "openingTime",
            &self.opening_time,
            "Opening time must look like 09:30",
        );
        let closing_time = optional_time(
            &mut errors,
            "closingTime",
            &self.closing_time,
            "Closing time must look like 22:00",
        );

        errors.into_result(RestaurantDetails {
            name,
            location,
            contact,
            description: non_blank(&self.description),
            opening_time,
            closing_time,
        })
    }
}

/// Body of `POST /api/restaurants` and `PUT /api/restaurants/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetails {
    pub name: String,
    pub location: String,
    pub contact: String,
    pub description: Option<String>,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
}

/// Menu item as typed by the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemForm {
    pub name: String,
    /// Rupees, e.g. `149.50`.
    pub price: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub is_available: bool,
}

impl Default for MenuItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            description: String::new(),
            category: String::new(),
            image_url: String::new(),
            is_available: true,
        }
    }
}

impl MenuItemForm {
    /// Check the form and build the create/update body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<MenuItemDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name, "Item name is required");

        let price = self.price.trim();
        let price = if price.is_empty() {
            errors.push("price", "Price is required");
            Amount::ZERO
        } else {
            match Decimal::from_str(price).map(Amount::new) {
                Ok(amount) if amount.is_positive() => amount,
                Ok(_) => {
                    errors.push("price", "Price must be greater than zero");
                    Amount::ZERO
                }
                Err(_) => {
                    errors.push("price", "Price must be a number");
                    Amount::ZERO
                }
            }
        };

        let category = required(&mut errors, "category", &self.category, "Category is required");

        errors.into_result(MenuItemDetails {
            name,
            price,
            description: non_blank(&self.description),
            category,
            image_url: non_blank(&self.image_url),
            is_available: self.is_available,
        })
    }
}

impl From<&MenuItem> for MenuItemForm {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone().unwrap_or_default(),
            price: item.price.decimal().normalize().to_string(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
            image_url: item.image_url.clone().unwrap_or_default(),
            is_available: item.is_orderable(),
        }
    }
}

/// Body of the menu item create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDetails {
    pub name: String,
    pub price: Amount,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
}

fn required(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) -> String {
    let value = value.trim();

    if value.is_empty() {
        errors.push(field, message);
    }

    value.to_string()
}

fn optional_time(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) -> Option<Time> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    value.parse().map_or_else(
        |_| {
            errors.push(field, message);
            None
        },
        Some,
    )
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Order placed at the owner's restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOrder {
    pub id: OrderId,
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OwnerOrderLine>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: Amount,
    pub status: OrderStatus,
}

impl OwnerOrder {
    /// Only pending orders can be accepted or rejected.
    #[must_use]
    pub fn awaits_decision(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Item names joined for a single line of output.
    #[must_use]
    pub fn item_names(&self) -> String {
        self.items
            .iter()
            .filter_map(|line| line.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One line of an [`OwnerOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerOrderLine {
    pub name: Option<String>,
}

/// The owner's answer to a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerDecision {
    Accepted,
    Rejected,
}

impl OwnerDecision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Status the order shows once the decision is stored.
    #[must_use]
    pub fn status(self) -> OrderStatus {
        OrderStatus::parse(self.as_str())
    }
}

impl Display for OwnerDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionBody {
    pub status: OwnerDecision,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn menu_form(price: &str) -> MenuItemForm {
        MenuItemForm {
            name: "Masala Dosa".to_string(),
            price: price.to_string(),
            category: "South Indian".to_string(),
            ..MenuItemForm::default()
        }
    }

    #[test]
    fn menu_item_body_uses_wire_names() -> TestResult {
        let details = menu_form(" 149.50 ").validate()?;

        assert_eq!(details.price, Amount::from_minor(149_50));
        assert_eq!(
            serde_json::to_value(&details)?,
            serde_json::json!({
                "name": "Masala Dosa",
                "price": 149.5,
                "description": null,
                "category": "South Indian",
                "imageUrl": null,
                "isAvailable": true
            })
        );

        Ok(())
    }

    #[test]
    fn menu_item_price_must_be_a_positive_number() {
        for (price, message) in [
            ("", "Price is required"),
            ("abc", "Price must be a number"),
            ("0", "Price must be greater than zero"),
            ("-5", "Price must be greater than zero"),
        ] {
            let errors = menu_form(price).validate().err();

            assert_eq!(
                errors.and_then(|errors| errors.get("price")),
                Some(message),
                "price {price:?}"
            );
        }
    }

    #[test]
    fn menu_item_needs_name_and_category() {
        let form = MenuItemForm {
            price: "10".to_string(),
            ..MenuItemForm::default()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Item name is required"));
        assert_eq!(errors.get("category"), Some("Category is required"));
    }

    #[test]
    fn restaurant_form_checks_required_fields_and_times() {
        let form = RestaurantForm {
            name: "Spice Route".to_string(),
            opening_time: "9 in the morning".to_string(),
            ..RestaurantForm::default()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("contact"), Some("Contact is required"));
        assert_eq!(errors.get("openingTime"), Some("Opening time must look like 09:30"));
        assert_eq!(errors.get("closingTime"), None);
    }

    #[test]
    fn stored_restaurant_round_trips_through_the_form() -> TestResult {
        let restaurant: OwnedRestaurant = serde_json::from_str(
            r#"{"id": 2, "name": "Spice Route", "location": "MG Road", "contact": "080-1234",
                "description": null, "openingTime": "09:30:00", "closingTime": null, "ownerId": 5}"#,
        )?;

        let form = restaurant.to_form();
        let details = form.validate()?;

        assert_eq!(form.opening_time, "09:30");
        assert_eq!(details.opening_time, Some(Time::constant(9, 30, 0, 0)));
        assert_eq!(details.closing_time, None);

        Ok(())
    }

    #[test]
    fn stored_menu_item_prefills_the_form() -> TestResult {
        let item: MenuItem = serde_json::from_str(
            r#"{"id": 4, "name": "Idli", "price": 45.50, "category": "Breakfast", "isAvailable": false}"#,
        )?;

        let form = MenuItemForm::from(&item);

        assert_eq!(form.price, "45.5");
        assert!(!form.is_available);
        assert_eq!(form.validate()?.price, Amount::from_minor(45_50));

        Ok(())
    }

    #[test]
    fn only_pending_orders_await_a_decision() -> TestResult {
        let order: OwnerOrder = serde_json::from_str(
            r#"{"id": 8, "customerName": "Asha", "items": [{"name": "Dosa"}, {"name": "Vada"}],
                "totalAmount": 180.0, "status": "PENDING"}"#,
        )?;

        assert!(order.awaits_decision());
        assert_eq!(order.item_names(), "Dosa, Vada");

        let accepted = OwnerOrder {
            status: OwnerDecision::Accepted.status(),
            ..order
        };

        assert!(!accepted.awaits_decision());

        Ok(())
    }

    #[test]
    fn decision_body() -> TestResult {
        let body = DecisionBody {
            status: OwnerDecision::Rejected,
        };

        assert_eq!(serde_json::to_string(&body)?, r#"{"status":"REJECTED"}"#);

        Ok(())
    }
}
