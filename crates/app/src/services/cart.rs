//! Cart service.

use async_trait::async_trait;
use mockall::automock;
use platter::cart::{AddToCart, Cart, CartItemId, QuantityUpdate};

use crate::{
    errors::ApiError,
    http::{ApiClient, Envelope},
};

#[derive(Debug, Clone)]
pub struct HttpCartService {
    client: ApiClient,
}

impl HttpCartService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Snapshot from a mutation envelope, re-fetching when the server sent
    /// none along.
    async fn snapshot(&self, envelope: Envelope<Cart>) -> Result<Cart, ApiError> {
        match envelope.into_result()? {
            Some(cart) => Ok(cart),
            None => self.get_cart().await,
        }
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn get_cart(&self) -> Result<Cart, ApiError> {
        let cart: Option<Cart> = self.client.get("/customer/cart").await?;

        Ok(cart.unwrap_or_default())
    }

    async fn add_item(&self, item: AddToCart) -> Result<Cart, ApiError> {
        let envelope = self.client.post("/customer/cart/add", &item).await?;

        self.snapshot(envelope).await
    }

    async fn update_quantity(
        &self,
        item: CartItemId,
        update: QuantityUpdate,
    ) -> Result<Cart, ApiError> {
        let envelope = self
            .client
            .put(&format!("/customer/cart/items/{item}"), &update)
            .await?;

        self.snapshot(envelope).await
    }

    async fn remove_item(&self, item: CartItemId) -> Result<Cart, ApiError> {
        let envelope = self
            .client
            .delete(&format!("/customer/cart/items/{item}"))
            .await?;

        self.snapshot(envelope).await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let envelope: Envelope<serde_json::Value> =
            self.client.delete("/customer/cart/clear").await?;

        envelope.into_result().map(|_| ())
    }
}

#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Current cart snapshot; an absent cart is empty.
    async fn get_cart(&self) -> Result<Cart, ApiError>;

    /// Add a menu item and return the new snapshot.
    async fn add_item(&self, item: AddToCart) -> Result<Cart, ApiError>;

    /// Set the quantity of one line and return the new snapshot.
    async fn update_quantity(
        &self,
        item: CartItemId,
        update: QuantityUpdate,
    ) -> Result<Cart, ApiError>;

    /// Remove one line and return the new snapshot.
    async fn remove_item(&self, item: CartItemId) -> Result<Cart, ApiError>;

    /// Empty the cart.
    async fn clear(&self) -> Result<(), ApiError>;
}
