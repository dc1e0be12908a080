//! App Context

use std::sync::Arc;

use platter::{cart_count::CartCountStore, restaurants::RestaurantId};
use reqwest::Client;

use crate::{
    http::ApiClient,
    services::{
        AuthService, CartService, DeliveryService, HttpAuthService, HttpCartService,
        HttpDeliveryService, HttpOrdersService, HttpOwnerService, HttpRestaurantsService,
        HttpReviewsService, OrdersService, OwnerService, RestaurantsService, ReviewsService,
    },
    session::SessionStore,
    views::{
        AuthFlow, CartView, CheckoutFlow, DeliveryBoard, MenuBrowser, OrdersView, OwnerDashboard,
        PaymentGateway, RestaurantBrowser, ReviewsView,
    },
};

/// Customer backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:9090";

/// Delivery service used when nothing else is configured.
pub const DEFAULT_DELIVERY_API_URL: &str = "http://localhost:9099";

/// Where the two backends live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_url: String,
    pub delivery_api_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            delivery_api_url: DEFAULT_DELIVERY_API_URL.to_string(),
        }
    }
}

/// Services and shared state every view is built from.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub restaurants: Arc<dyn RestaurantsService>,
    pub cart: Arc<dyn CartService>,
    pub orders: Arc<dyn OrdersService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub delivery: Arc<dyn DeliveryService>,
    pub owner: Arc<dyn OwnerService>,
    pub session: Arc<dyn SessionStore>,
    pub cart_count: CartCountStore,
}

impl AppContext {
    /// HTTP services for both backends, sharing one connection pool and
    /// one session store.
    #[must_use]
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionStore>) -> Self {
        let http = Client::new();
        let customer = ApiClient::with_client(http.clone(), &config.api_url, Arc::clone(&session));
        let delivery =
            ApiClient::with_client(http, &config.delivery_api_url, Arc::clone(&session));

        Self {
            auth: Arc::new(HttpAuthService::new(customer.clone(), delivery.clone())),
            restaurants: Arc::new(HttpRestaurantsService::new(customer.clone())),
            cart: Arc::new(HttpCartService::new(customer.clone())),
            orders: Arc::new(HttpOrdersService::new(customer.clone())),
            reviews: Arc::new(HttpReviewsService::new(customer.clone())),
            owner: Arc::new(HttpOwnerService::new(customer)),
            delivery: Arc::new(HttpDeliveryService::new(delivery)),
            session,
            cart_count: CartCountStore::new(),
        }
    }

    #[must_use]
    pub fn auth_flow(&self) -> AuthFlow {
        AuthFlow::new(
            Arc::clone(&self.auth),
            Arc::clone(&self.session),
            self.cart_count.clone(),
        )
    }

    #[must_use]
    pub fn restaurant_browser(&self) -> RestaurantBrowser {
        RestaurantBrowser::new(Arc::clone(&self.restaurants))
    }

    #[must_use]
    pub fn menu_browser(&self, restaurant: RestaurantId) -> MenuBrowser {
        MenuBrowser::new(Arc::clone(&self.restaurants), restaurant)
    }

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::new(Arc::clone(&self.cart), self.cart_count.clone())
    }

    #[must_use]
    pub fn checkout(&self, gateway: Arc<dyn PaymentGateway>) -> CheckoutFlow {
        CheckoutFlow::new(
            Arc::clone(&self.cart),
            Arc::clone(&self.orders),
            gateway,
            Arc::clone(&self.session),
            self.cart_count.clone(),
        )
    }

    #[must_use]
    pub fn orders_view(&self) -> OrdersView {
        OrdersView::new(Arc::clone(&self.orders))
    }

    #[must_use]
    pub fn reviews_view(&self) -> ReviewsView {
        ReviewsView::new(Arc::clone(&self.reviews))
    }

    #[must_use]
    pub fn delivery_board(&self) -> DeliveryBoard {
        DeliveryBoard::new(Arc::clone(&self.delivery))
    }

    #[must_use]
    pub fn owner_dashboard(&self) -> OwnerDashboard {
        OwnerDashboard::new(Arc::clone(&self.owner))
    }
}
