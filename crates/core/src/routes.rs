//! Client-side routes.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{delivery::DeliveryOrderId, orders::OrderId, restaurants::RestaurantId};

/// Every view the client can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    CustomerHome,
    Restaurants,
    Restaurant(RestaurantId),
    Cart,
    Checkout,
    Orders,
    Order(OrderId),
    Reviews,
    Profile,
    AdminDashboard,
    OwnerDashboard,
    DeliveryLogin,
    DeliveryDashboard,
    DeliveryOrder(DeliveryOrderId),
    Error,
}

impl Route {
    /// Whether the view needs a stored session token.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        !matches!(self, Self::Login | Self::DeliveryLogin | Self::Error)
    }

    /// Resolve a path back into a route.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] | ["login"] => Self::Login,
            ["CusDashboard"] => Self::CustomerHome,
            ["CusDashboard", "restaurants"] => Self::Restaurants,
            ["CusDashboard", "restaurants", id] => Self::Restaurant(id.parse().ok()?),
            ["CusDashboard", "cart"] => Self::Cart,
            ["CusDashboard", "checkout"] => Self::Checkout,
            ["CusDashboard", "orders"] => Self::Orders,
            ["CusDashboard", "orders", id] => Self::Order(id.parse().ok()?),
            ["CusDashboard", "reviews"] => Self::Reviews,
            ["CusDashboard", "profile"] => Self::Profile,
            ["admindashboard"] => Self::AdminDashboard,
            ["resowner"] => Self::OwnerDashboard,
            ["delivery", "login"] => Self::DeliveryLogin,
            ["deliveryp"] | ["dashboard"] => Self::DeliveryDashboard,
            ["deliveryp", "orders", id] => Self::DeliveryOrder(DeliveryOrderId::from(*id)),
            ["error"] => Self::Error,
            _ => return None,
        };

        Some(route)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Login => f.write_str("/"),
            Self::CustomerHome => f.write_str("/CusDashboard"),
            Self::Restaurants => f.write_str("/CusDashboard/restaurants"),
            Self::Restaurant(id) => write!(f, "/CusDashboard/restaurants/{id}"),
            Self::Cart => f.write_str("/CusDashboard/cart"),
            Self::Checkout => f.write_str("/CusDashboard/checkout"),
            Self::Orders => f.write_str("/CusDashboard/orders"),
            Self::Order(id) => write!(f, "/CusDashboard/orders/{id}"),
            Self::Reviews => f.write_str("/CusDashboard/reviews"),
            Self::Profile => f.write_str("/CusDashboard/profile"),
            Self::AdminDashboard => f.write_str("/admindashboard"),
            Self::OwnerDashboard => f.write_str("/resowner"),
            Self::DeliveryLogin => f.write_str("/delivery/login"),
            Self::DeliveryDashboard => f.write_str("/deliveryp"),
            Self::DeliveryOrder(id) => write!(f, "/deliveryp/orders/{id}"),
            Self::Error => f.write_str("/error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_back_to_their_route() {
        let routes = [
            Route::Login,
            Route::CustomerHome,
            Route::Restaurant(RestaurantId::new(3)),
            Route::Cart,
            Route::Order(OrderId::new(11)),
            Route::DeliveryLogin,
            Route::DeliveryOrder(DeliveryOrderId::from("ord-9")),
            Route::Error,
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.to_string()), Some(route.clone()));
        }
    }

    #[test]
    fn malformed_ids_do_not_resolve() {
        assert_eq!(Route::parse("/CusDashboard/orders/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn only_login_pages_and_error_are_public() {
        assert!(!Route::Login.requires_session());
        assert!(!Route::DeliveryLogin.requires_session());
        assert!(!Route::Error.requires_session());
        assert!(Route::Cart.requires_session());
    }
}
