//! Restaurants and menus service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    restaurants::{MenuItem, Restaurant, RestaurantId},
    search::{MenuSearchRequest, Page, RestaurantSearchRequest},
};
use reqwest::Method;

use crate::{errors::ApiError, http::ApiClient};

#[derive(Debug, Clone)]
pub struct HttpRestaurantsService {
    client: ApiClient,
}

impl HttpRestaurantsService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RestaurantsService for HttpRestaurantsService {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let restaurants: Option<Vec<Restaurant>> = self.client.get("/customer/restaurants").await?;

        Ok(restaurants.unwrap_or_default())
    }

    async fn top_rated(&self, limit: u32) -> Result<Vec<Restaurant>, ApiError> {
        let request = self
            .client
            .request(Method::GET, "/customer/restaurants/top-rated")
            .query(&[("limit", limit)]);

        let restaurants: Option<Vec<Restaurant>> = self.client.send_json(request).await?;

        Ok(restaurants.unwrap_or_default())
    }

    async fn cuisines(&self) -> Result<Vec<String>, ApiError> {
        let cuisines: Option<Vec<String>> =
            self.client.get("/customer/restaurants/cuisines").await?;

        Ok(cuisines.unwrap_or_default())
    }

    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.client
            .get(&format!("/customer/restaurants/{id}"))
            .await
    }

    async fn menu(&self, id: RestaurantId) -> Result<Vec<MenuItem>, ApiError> {
        let items: Option<Vec<MenuItem>> = self
            .client
            .get(&format!("/customer/restaurants/{id}/menu"))
            .await?;

        Ok(items.unwrap_or_default())
    }

    async fn menu_categories(&self, id: RestaurantId) -> Result<Vec<String>, ApiError> {
        let categories: Option<Vec<String>> = self
            .client
            .get(&format!("/customer/restaurants/{id}/menu/categories"))
            .await?;

        Ok(categories.unwrap_or_default())
    }

    async fn search_restaurants(
        &self,
        request: RestaurantSearchRequest,
    ) -> Result<Page<Restaurant>, ApiError> {
        let page: Option<Page<Restaurant>> = self
            .client
            .post("/customer/restaurants/search", &request)
            .await?;

        Ok(page.unwrap_or_else(Page::empty))
    }

    async fn search_menu(&self, request: MenuSearchRequest) -> Result<Page<MenuItem>, ApiError> {
        let page: Option<Page<MenuItem>> =
            self.client.post("/customer/menu/search", &request).await?;

        Ok(page.unwrap_or_else(Page::empty))
    }
}

#[automock]
#[async_trait]
pub trait RestaurantsService: Send + Sync {
    /// Every active restaurant.
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    /// Best rated restaurants, at most `limit`.
    async fn top_rated(&self, limit: u32) -> Result<Vec<Restaurant>, ApiError>;

    /// Cuisine names to filter by.
    async fn cuisines(&self) -> Result<Vec<String>, ApiError>;

    /// A single restaurant.
    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError>;

    /// Full menu of a restaurant.
    async fn menu(&self, id: RestaurantId) -> Result<Vec<MenuItem>, ApiError>;

    /// Menu categories of a restaurant.
    async fn menu_categories(&self, id: RestaurantId) -> Result<Vec<String>, ApiError>;

    /// Server-side restaurant search.
    async fn search_restaurants(
        &self,
        request: RestaurantSearchRequest,
    ) -> Result<Page<Restaurant>, ApiError>;

    /// Server-side menu search.
    async fn search_menu(&self, request: MenuSearchRequest) -> Result<Page<MenuItem>, ApiError>;
}
