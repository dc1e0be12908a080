//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    checkout::OrderRequest,
    orders::{Order, OrderId},
};
use reqwest::Method;

use crate::{
    errors::ApiError,
    http::{ApiClient, Envelope},
};

/// Payment status sent when the gateway reports success.
const PAYMENT_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    client: ApiClient,
}

impl HttpOrdersService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    async fn create_order(&self, request: OrderRequest) -> Result<Order, ApiError> {
        let envelope: Envelope<Order> = self.client.post("/customer/orders", &request).await?;

        envelope
            .into_result()?
            .ok_or_else(|| ApiError::rejected("The server did not return the created order"))
    }

    async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Option<Vec<Order>> = self.client.get("/customer/orders").await?;

        Ok(orders.unwrap_or_default())
    }

    async fn active_orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Option<Vec<Order>> = self.client.get("/customer/orders/active").await?;

        Ok(orders.unwrap_or_default())
    }

    async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client.get(&format!("/customer/orders/{id}")).await
    }

    async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        let envelope: Envelope<serde_json::Value> = self
            .client
            .put(&format!("/customer/orders/{id}/cancel"), &serde_json::json!({}))
            .await?;

        envelope.into_result().map(|_| ())
    }

    async fn mark_paid(&self, order_number: String, payment_id: String) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::PUT, &format!("/customer/orders/{order_number}/payment"))
            .query(&[
                ("paymentStatus", PAYMENT_COMPLETED),
                ("paymentId", payment_id.as_str()),
            ]);

        let envelope: Envelope<serde_json::Value> = self.client.send_json(request).await?;

        envelope.into_result().map(|_| ())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order from the current cart.
    async fn create_order(&self, request: OrderRequest) -> Result<Order, ApiError>;

    /// Every order of the customer, newest first.
    async fn orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Orders that are not yet delivered or cancelled.
    async fn active_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// A single order.
    async fn order(&self, id: OrderId) -> Result<Order, ApiError>;

    /// Ask the server to cancel an order.
    async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError>;

    /// Record a completed gateway payment against an order.
    async fn mark_paid(&self, order_number: String, payment_id: String) -> Result<(), ApiError>;
}
