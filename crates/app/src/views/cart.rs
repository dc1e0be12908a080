//! Cart view controller.
//!
//! The server owns the cart. Every successful mutation replaces the local
//! snapshot with the server's answer and republishes the badge count; a
//! failed one leaves the snapshot as it was.

use std::{num::NonZeroU32, sync::Arc};

use parking_lot::RwLock;
use platter::{
    busy::BusyFlags,
    cart::{AddToCart, Cart, CartItem, CartItemId, CartScreen, QuantityUpdate},
    cart_count::CartCountStore,
    restaurants::MenuItemId,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    errors::{ApiError, Notice},
    services::CartService,
    views::ViewLifetime,
};

/// Cart mutation that did not go through.
#[derive(Debug, Error)]
pub enum CartActionError {
    #[error("an update for this item is already in progress")]
    Busy,

    #[error("quantity cannot go below one")]
    BelowOne,

    #[error("item is not in the cart")]
    UnknownItem,

    #[error("the cart view was closed")]
    Closed,

    #[error("failed to update the cart")]
    Api {
        #[source]
        source: ApiError,
        fallback: &'static str,
    },
}

impl CartActionError {
    fn api(source: ApiError, fallback: &'static str) -> Self {
        warn!(error = %source, "cart mutation failed");

        Self::Api { source, fallback }
    }

    /// What to show, if anything. Locally refused actions are silent.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Api { source, fallback } => Some(Notice::for_mutation(source, fallback)),
            Self::Busy | Self::BelowOne | Self::UnknownItem | Self::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WholeCart {
    Clear,
}

/// Cart screen state plus the actions it offers.
pub struct CartView {
    service: Arc<dyn CartService>,
    count: CartCountStore,
    items: BusyFlags<CartItemId>,
    adding: BusyFlags<MenuItemId>,
    whole: BusyFlags<WholeCart>,
    snapshot: RwLock<Option<Cart>>,
    lifetime: ViewLifetime,
}

impl CartView {
    #[must_use]
    pub fn new(service: Arc<dyn CartService>, count: CartCountStore) -> Self {
        Self {
            service,
            count,
            items: BusyFlags::new(),
            adding: BusyFlags::new(),
            whole: BusyFlags::new(),
            snapshot: RwLock::new(None),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Last snapshot received from the server.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.snapshot.read().clone()
    }

    #[must_use]
    pub fn screen(&self) -> CartScreen {
        CartScreen::for_snapshot(self.snapshot.read().as_ref())
    }

    #[must_use]
    pub fn is_busy(&self, item: CartItemId) -> bool {
        self.items.is_busy(&item)
    }

    /// Fetch the cart. On failure the previous snapshot stays.
    ///
    /// # Errors
    ///
    /// Returns the notice to show instead of the cart.
    pub async fn load(&self) -> Result<Cart, Notice> {
        let cart = self
            .service
            .get_cart()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch cart"))?;

        self.accept(cart)
            .ok_or_else(|| Notice::Placeholder("The cart view was closed".to_string()))
    }

    /// Add a menu item. Refused while the same menu item is being added.
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn add(
        &self,
        menu_item_id: MenuItemId,
        quantity: NonZeroU32,
        special_instructions: Option<String>,
    ) -> Result<Cart, CartActionError> {
        let _guard = self
            .adding
            .try_acquire(menu_item_id)
            .ok_or(CartActionError::Busy)?;

        let request = AddToCart {
            menu_item_id,
            quantity,
            special_instructions,
        };

        let cart = self
            .service
            .add_item(request)
            .await
            .map_err(|error| CartActionError::api(error, "Failed to add item to cart"))?;

        self.accept(cart).ok_or(CartActionError::Closed)
    }

    /// One more of a line.
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn increment(&self, item: CartItemId) -> Result<Cart, CartActionError> {
        let quantity = self
            .line_quantity(item, CartItem::incremented)?
            .ok_or(CartActionError::UnknownItem)?;

        self.set_quantity(item, quantity).await
    }

    /// One fewer of a line. Refused at quantity one; use [`Self::remove`].
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn decrement(&self, item: CartItemId) -> Result<Cart, CartActionError> {
        let quantity = self
            .line_quantity(item, CartItem::decremented)?
            .ok_or(CartActionError::BelowOne)?;

        self.set_quantity(item, quantity).await
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn set_quantity(
        &self,
        item: CartItemId,
        quantity: NonZeroU32,
    ) -> Result<Cart, CartActionError> {
        let _guard = self.items.try_acquire(item).ok_or(CartActionError::Busy)?;

        debug!(%item, quantity, "updating cart line");

        let cart = self
            .service
            .update_quantity(item, QuantityUpdate::new(quantity))
            .await
            .map_err(|error| CartActionError::api(error, "Failed to update cart item"))?;

        self.accept(cart).ok_or(CartActionError::Closed)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn remove(&self, item: CartItemId) -> Result<Cart, CartActionError> {
        let _guard = self.items.try_acquire(item).ok_or(CartActionError::Busy)?;

        let cart = self
            .service
            .remove_item(item)
            .await
            .map_err(|error| CartActionError::api(error, "Failed to remove cart item"))?;

        self.accept(cart).ok_or(CartActionError::Closed)
    }

    /// Empty the cart, then take the server's snapshot of the empty cart.
    ///
    /// # Errors
    ///
    /// Returns why the cart did not change.
    pub async fn clear(&self) -> Result<Cart, CartActionError> {
        let _guard = self
            .whole
            .try_acquire(WholeCart::Clear)
            .ok_or(CartActionError::Busy)?;

        self.service
            .clear()
            .await
            .map_err(|error| CartActionError::api(error, "Failed to clear cart"))?;

        let cart = self
            .service
            .get_cart()
            .await
            .map_err(|error| CartActionError::api(error, "Failed to clear cart"))?;

        self.accept(cart).ok_or(CartActionError::Closed)
    }

    fn line_quantity(
        &self,
        item: CartItemId,
        step: fn(&CartItem) -> Option<NonZeroU32>,
    ) -> Result<Option<NonZeroU32>, CartActionError> {
        let snapshot = self.snapshot.read();
        let line = snapshot
            .as_ref()
            .and_then(|cart| cart.item(item))
            .ok_or(CartActionError::UnknownItem)?;

        Ok(step(line))
    }

    /// Store a server snapshot verbatim and publish its count.
    fn accept(&self, cart: Cart) -> Option<Cart> {
        let cart = self.lifetime.keep(cart)?;

        self.count.publish_cart(&cart);
        *self.snapshot.write() = Some(cart.clone());

        Some(cart)
    }
}
