//! Cart snapshot
//!
//! The cart is computed by the server and cached by the client. Nothing in
//! here recomputes totals: every amount is taken verbatim from the last
//! snapshot the server returned. The only derived value is the minimum-order
//! shortfall shown next to a disabled checkout action.

use std::num::NonZeroU32;

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    money::Amount,
    restaurants::{MenuItemId, RestaurantId},
    routes::Route,
    wire::null_as_default,
};

/// Cart Id
pub type CartId = TypedId<Cart>;

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// Cart snapshot as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Option<CartId>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
    pub restaurant_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_fee: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_order_amount: Amount,
    #[serde(
        rename = "cartItems",
        default,
        deserialize_with = "null_as_default"
    )]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtotal: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_amount: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grand_total: Amount,
    pub total_items: Option<u32>,
    pub updated_at: Option<DateTime>,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.total_items
            .unwrap_or_else(|| self.items.iter().map(|item| item.quantity).sum())
    }

    /// Look up a line of the cart.
    #[must_use]
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// How much more must be added before checkout is allowed, if anything.
    #[must_use]
    pub fn minimum_order_shortfall(&self) -> Option<Amount> {
        if self.subtotal >= self.min_order_amount {
            return None;
        }

        self.min_order_amount
            .checked_sub(self.subtotal)
            .filter(|shortfall| shortfall.is_positive())
    }

    /// Whether the checkout action is available for this snapshot.
    #[must_use]
    pub fn checkout_gate(&self) -> CheckoutGate {
        match self.minimum_order_shortfall() {
            Some(shortfall) => CheckoutGate::BelowMinimum { shortfall },
            None => CheckoutGate::Open,
        }
    }
}

/// Cart line as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: u32,
    /// Unit price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Amount,
    /// Line total.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_price: Amount,
    pub special_instructions: Option<String>,
    pub menu_item_id: Option<MenuItemId>,
    pub menu_item_name: Option<String>,
    pub menu_item_description: Option<String>,
    pub menu_item_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegetarian: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_vegan: bool,
    pub spice_level: Option<String>,
    pub category: Option<String>,
}

impl CartItem {
    /// Quantity after a one-step decrement, if it stays at least one.
    #[must_use]
    pub fn decremented(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.quantity.saturating_sub(1))
    }

    /// Quantity after a one-step increment.
    #[must_use]
    pub fn incremented(&self) -> Option<NonZeroU32> {
        self.quantity.checked_add(1).and_then(NonZeroU32::new)
    }
}

/// Whether the checkout action is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutGate {
    Open,
    BelowMinimum { shortfall: Amount },
}

impl CheckoutGate {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Hint displayed when checkout is disabled.
    #[must_use]
    pub fn message(self) -> Option<String> {
        match self {
            Self::Open => None,
            Self::BelowMinimum { shortfall } => Some(format!(
                "Add {shortfall} more to meet the minimum order amount"
            )),
        }
    }
}

/// What the cart view renders for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartScreen {
    /// No snapshot could be fetched.
    Unavailable,

    /// Nothing in the cart: show the empty state and a way back to browsing.
    Empty { browse: Route },

    /// Items, order summary and the checkout action.
    Summary { gate: CheckoutGate },
}

impl CartScreen {
    #[must_use]
    pub fn for_snapshot(cart: Option<&Cart>) -> Self {
        match cart {
            None => Self::Unavailable,
            Some(cart) if cart.is_empty() => Self::Empty {
                browse: Route::Restaurants,
            },
            Some(cart) => Self::Summary {
                gate: cart.checkout_gate(),
            },
        }
    }
}

/// Body of an add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub menu_item_id: MenuItemId,
    pub quantity: NonZeroU32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Body of a quantity update request.
///
/// The quantity type makes a request for zero unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityUpdate {
    menu_item_id: Option<MenuItemId>,
    quantity: NonZeroU32,
}

impl QuantityUpdate {
    #[must_use]
    pub const fn new(quantity: NonZeroU32) -> Self {
        Self {
            menu_item_id: None,
            quantity,
        }
    }

    #[must_use]
    pub const fn quantity(self) -> NonZeroU32 {
        self.quantity
    }
}
