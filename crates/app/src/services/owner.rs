//! Restaurant owner service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    orders::OrderId,
    owner::{
        DecisionBody, MenuItemDetails, OwnedRestaurant, OwnerDecision, OwnerOrder,
        RestaurantDetails,
    },
    restaurants::{MenuItem, MenuItemId, RestaurantId},
};
use reqwest::Method;

use crate::{
    errors::ApiError,
    http::{ApiClient, Envelope},
};

#[derive(Debug, Clone)]
pub struct HttpOwnerService {
    client: ApiClient,
}

impl HttpOwnerService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OwnerService for HttpOwnerService {
    async fn my_restaurants(&self) -> Result<Vec<OwnedRestaurant>, ApiError> {
        let restaurants: Option<Vec<OwnedRestaurant>> =
            self.client.get("/api/restaurants/owner").await?;

        Ok(restaurants.unwrap_or_default())
    }

    async fn create_restaurant(
        &self,
        details: RestaurantDetails,
    ) -> Result<Option<OwnedRestaurant>, ApiError> {
        self.client.post("/api/restaurants", &details).await
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        details: RestaurantDetails,
    ) -> Result<Option<OwnedRestaurant>, ApiError> {
        self.client
            .put(&format!("/api/restaurants/{id}"), &details)
            .await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::DELETE, &format!("/api/restaurants/{id}"));

        self.client.send_text(request).await?;

        Ok(())
    }

    async fn menu_items(&self, restaurant: RestaurantId) -> Result<Vec<MenuItem>, ApiError> {
        let items: Option<Vec<MenuItem>> = self
            .client
            .get(&format!("/api/menu-items/restaurant/{restaurant}"))
            .await?;

        Ok(items.unwrap_or_default())
    }

    async fn create_menu_item(
        &self,
        restaurant: RestaurantId,
        details: MenuItemDetails,
    ) -> Result<Option<MenuItem>, ApiError> {
        let envelope: Envelope<MenuItem> = self
            .client
            .post(&format!("/api/menu-items/restaurant/{restaurant}"), &details)
            .await?;

        envelope.into_result()
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        details: MenuItemDetails,
    ) -> Result<Option<MenuItem>, ApiError> {
        let envelope: Envelope<MenuItem> = self
            .client
            .put(&format!("/api/menu-items/{id}"), &details)
            .await?;

        envelope.into_result()
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError> {
        let envelope: Envelope<MenuItem> =
            self.client.delete(&format!("/api/menu-items/{id}")).await?;

        envelope.into_result().map(|_| ())
    }

    async fn restaurant_orders(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Vec<OwnerOrder>, ApiError> {
        let orders: Option<Vec<OwnerOrder>> = self
            .client
            .get(&format!("/api/orders/restaurant/{restaurant}"))
            .await?;

        Ok(orders.unwrap_or_default())
    }

    async fn decide(&self, order: OrderId, decision: OwnerDecision) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::PUT, &format!("/api/orders/{order}/status"))
            .json(&DecisionBody { status: decision });

        self.client.send_text(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OwnerService: Send + Sync {
    /// Restaurants owned by the logged-in user. The first one is managed.
    async fn my_restaurants(&self) -> Result<Vec<OwnedRestaurant>, ApiError>;

    async fn create_restaurant(
        &self,
        details: RestaurantDetails,
    ) -> Result<Option<OwnedRestaurant>, ApiError>;

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        details: RestaurantDetails,
    ) -> Result<Option<OwnedRestaurant>, ApiError>;

    async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), ApiError>;

    /// Every menu item of the restaurant, available or not.
    async fn menu_items(&self, restaurant: RestaurantId) -> Result<Vec<MenuItem>, ApiError>;

    async fn create_menu_item(
        &self,
        restaurant: RestaurantId,
        details: MenuItemDetails,
    ) -> Result<Option<MenuItem>, ApiError>;

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        details: MenuItemDetails,
    ) -> Result<Option<MenuItem>, ApiError>;

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError>;

    /// Orders placed at the restaurant.
    async fn restaurant_orders(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Vec<OwnerOrder>, ApiError>;

    /// Accept or reject a pending order.
    async fn decide(&self, order: OrderId, decision: OwnerDecision) -> Result<(), ApiError>;
}
