//! Restaurant and menu display records.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ids::TypedId, money::Amount, wire::null_as_default};

/// Restaurant Id
pub type RestaurantId = TypedId<Restaurant>;

/// Menu Item Id
pub type MenuItemId = TypedId<MenuItem>;

/// Restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cuisine_type: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_fee: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_order_amount: Amount,
    /// Average delivery time in minutes.
    pub avg_delivery_time: Option<u32>,
    pub rating: Option<Decimal>,
    pub total_reviews: Option<u32>,
    pub created_at: Option<DateTime>,
}

impl Restaurant {
    /// Name for display, never empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed restaurant")
    }
}

/// Menu Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Amount,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegetarian: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegan: bool,
    pub spice_level: Option<String>,
    /// Preparation time in minutes.
    pub prep_time: Option<u32>,
    pub category: Option<String>,
    pub calories: Option<u32>,
    pub rating: Option<Decimal>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
}

impl MenuItem {
    /// Items are orderable unless the server says otherwise.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.is_available.unwrap_or(true)
    }
}
