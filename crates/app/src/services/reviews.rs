//! Reviews service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    restaurants::RestaurantId,
    reviews::{Review, ReviewRequest},
};

use crate::{
    errors::ApiError,
    http::{ApiClient, Envelope},
};

#[derive(Debug, Clone)]
pub struct HttpReviewsService {
    client: ApiClient,
}

impl HttpReviewsService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReviewsService for HttpReviewsService {
    async fn submit(&self, request: ReviewRequest) -> Result<Option<Review>, ApiError> {
        let envelope: Envelope<Review> = self.client.post("/customer/reviews", &request).await?;

        envelope.into_result()
    }

    async fn my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let reviews: Option<Vec<Review>> = self.client.get("/customer/reviews").await?;

        Ok(reviews.unwrap_or_default())
    }

    async fn restaurant_reviews(&self, id: RestaurantId) -> Result<Vec<Review>, ApiError> {
        let reviews: Option<Vec<Review>> = self
            .client
            .get(&format!("/customer/restaurants/{id}/reviews"))
            .await?;

        Ok(reviews.unwrap_or_default())
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Submit a review for a delivered order.
    async fn submit(&self, request: ReviewRequest) -> Result<Option<Review>, ApiError>;

    /// Reviews written by the customer.
    async fn my_reviews(&self) -> Result<Vec<Review>, ApiError>;

    /// Reviews of one restaurant.
    async fn restaurant_reviews(&self, id: RestaurantId) -> Result<Vec<Review>, ApiError>;
}
