//! Delivery partner service.

use async_trait::async_trait;
use mockall::automock;
use platter::delivery::{
    Availability, DeliveryOrder, DeliveryOrderId, DeliveryStatus, PartnerFeedback, PartnerProfile,
    StatusChange,
};
use reqwest::Method;

use crate::{errors::ApiError, http::ApiClient};

#[derive(Debug, Clone)]
pub struct HttpDeliveryService {
    client: ApiClient,
}

impl HttpDeliveryService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeliveryService for HttpDeliveryService {
    async fn pending_orders(&self) -> Result<Vec<DeliveryOrder>, ApiError> {
        let orders: Option<Vec<DeliveryOrder>> = self.client.get("/api/orders/pending").await?;

        Ok(orders.unwrap_or_default())
    }

    async fn accept(&self, id: DeliveryOrderId) -> Result<String, ApiError> {
        let request = self
            .client
            .request(Method::POST, &format!("/api/orders/{id}/accept"));

        self.client.send_text(request).await
    }

    async fn reject(&self, id: DeliveryOrderId) -> Result<String, ApiError> {
        let request = self
            .client
            .request(Method::POST, &format!("/api/orders/{id}/reject"));

        self.client.send_text(request).await
    }

    async fn order(&self, id: DeliveryOrderId) -> Result<DeliveryOrder, ApiError> {
        self.client.get(&format!("/api/orders/{id}")).await
    }

    async fn update_status(
        &self,
        id: DeliveryOrderId,
        status: DeliveryStatus,
    ) -> Result<String, ApiError> {
        let request = self
            .client
            .request(Method::POST, &format!("/api/orders/{id}/status"))
            .json(&StatusChange { status });

        self.client.send_text(request).await
    }

    async fn history(&self) -> Result<Vec<DeliveryOrder>, ApiError> {
        let orders: Option<Vec<DeliveryOrder>> = self.client.get("/api/orders/history").await?;

        Ok(orders.unwrap_or_default())
    }

    async fn availability(&self) -> Result<bool, ApiError> {
        let availability: Availability =
            self.client.get("/api/delivery/auth/availability").await?;

        Ok(availability.is_available)
    }

    async fn set_availability(&self, is_available: bool) -> Result<bool, ApiError> {
        let availability: Availability = self
            .client
            .put(
                "/api/delivery/auth/availability",
                &Availability { is_available },
            )
            .await?;

        Ok(availability.is_available)
    }

    async fn profile(&self) -> Result<PartnerProfile, ApiError> {
        self.client.get("/api/delivery/auth/profile").await
    }

    async fn update_profile(&self, profile: PartnerProfile) -> Result<PartnerProfile, ApiError> {
        self.client
            .put("/api/delivery/auth/profile", &profile)
            .await
    }

    async fn submit_feedback(&self, feedback: PartnerFeedback) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::POST, "/api/feedback")
            .json(&feedback);

        self.client.send_text(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Orders waiting for a partner.
    async fn pending_orders(&self) -> Result<Vec<DeliveryOrder>, ApiError>;

    /// Take a pending order. Returns the server's confirmation text.
    async fn accept(&self, id: DeliveryOrderId) -> Result<String, ApiError>;

    /// Decline a pending order. Returns the server's confirmation text.
    async fn reject(&self, id: DeliveryOrderId) -> Result<String, ApiError>;

    /// A single delivery order.
    async fn order(&self, id: DeliveryOrderId) -> Result<DeliveryOrder, ApiError>;

    /// Move an accepted order along. Returns the server's confirmation text.
    async fn update_status(
        &self,
        id: DeliveryOrderId,
        status: DeliveryStatus,
    ) -> Result<String, ApiError>;

    /// Orders the partner has delivered.
    async fn history(&self) -> Result<Vec<DeliveryOrder>, ApiError>;

    /// Whether the partner is taking orders.
    async fn availability(&self) -> Result<bool, ApiError>;

    /// Change availability; returns the value the server stored.
    async fn set_availability(&self, is_available: bool) -> Result<bool, ApiError>;

    /// Partner profile.
    async fn profile(&self) -> Result<PartnerProfile, ApiError>;

    /// Update name, email, phone and vehicle number.
    async fn update_profile(&self, profile: PartnerProfile) -> Result<PartnerProfile, ApiError>;

    /// Feedback about a delivery.
    async fn submit_feedback(&self, feedback: PartnerFeedback) -> Result<(), ApiError>;
}
