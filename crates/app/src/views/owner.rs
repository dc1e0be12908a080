//! Restaurant owner dashboard.
//!
//! The owner manages the first restaurant the backend lists for them. Menu
//! items and orders each carry their own busy flag so that one slow request
//! never blocks actions on other rows.

use std::sync::Arc;

use parking_lot::RwLock;
use platter::{
    busy::BusyFlags,
    forms::FieldErrors,
    orders::{OrderId, OrderStatus},
    owner::{MenuItemForm, OwnedRestaurant, OwnerDecision, OwnerOrder, RestaurantForm},
    restaurants::{MenuItem, MenuItemId, RestaurantId},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    errors::{ApiError, Notice},
    services::OwnerService,
    views::ViewLifetime,
};

const NO_RESTAURANT: &str = "No restaurant found. Please add your restaurant first.";

#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("the form has invalid fields")]
    Invalid(FieldErrors),

    #[error("no restaurant is registered for this owner")]
    NoRestaurant,

    #[error("menu item {0} is already being changed")]
    MenuItemBusy(MenuItemId),

    #[error("order {0} is already being updated")]
    OrderBusy(OrderId),

    #[error("order {id} is {status} and no longer awaits a decision")]
    NotPending { id: OrderId, status: OrderStatus },

    #[error("a save is already in progress")]
    Saving,

    #[error("the dashboard was closed")]
    Closed,

    #[error("owner request failed")]
    Api {
        #[source]
        source: ApiError,
        fallback: &'static str,
    },
}

impl OwnerError {
    fn api(source: ApiError, fallback: &'static str) -> Self {
        warn!(error = %source, "owner action failed");

        Self::Api { source, fallback }
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Invalid(errors) => Some(Notice::Inline(errors.clone())),
            Self::NoRestaurant => Some(Notice::Alert(NO_RESTAURANT.to_string())),
            Self::Api { source, fallback } => Some(Notice::for_mutation(source, fallback)),
            Self::MenuItemBusy(_)
            | Self::OrderBusy(_)
            | Self::NotPending { .. }
            | Self::Saving
            | Self::Closed => None,
        }
    }
}

/// Forms that cannot be submitted twice at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PendingSave {
    Restaurant,
    NewMenuItem,
}

pub struct OwnerDashboard {
    service: Arc<dyn OwnerService>,
    restaurant: RwLock<Option<OwnedRestaurant>>,
    menu: RwLock<Vec<MenuItem>>,
    orders: RwLock<Vec<OwnerOrder>>,
    saving: BusyFlags<PendingSave>,
    menu_busy: BusyFlags<MenuItemId>,
    order_busy: BusyFlags<OrderId>,
    lifetime: ViewLifetime,
}

impl OwnerDashboard {
    #[must_use]
    pub fn new(service: Arc<dyn OwnerService>) -> Self {
        Self {
            service,
            restaurant: RwLock::new(None),
            menu: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
            saving: BusyFlags::new(),
            menu_busy: BusyFlags::new(),
            order_busy: BusyFlags::new(),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// The managed restaurant as last loaded.
    #[must_use]
    pub fn restaurant(&self) -> Option<OwnedRestaurant> {
        self.restaurant.read().clone()
    }

    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        self.menu.read().clone()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<OwnerOrder> {
        self.orders.read().clone()
    }

    #[must_use]
    pub fn is_menu_item_busy(&self, id: MenuItemId) -> bool {
        self.menu_busy.is_busy(&id)
    }

    #[must_use]
    pub fn is_order_busy(&self, id: OrderId) -> bool {
        self.order_busy.is_busy(&id)
    }

    fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant.read().as_ref().map(|restaurant| restaurant.id)
    }

    /// Fetch the owner's restaurant. `None` means none was added yet.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn load(&self) -> Result<Option<OwnedRestaurant>, Notice> {
        let restaurants = self
            .service
            .my_restaurants()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch restaurant"))?;

        let restaurant = self
            .lifetime
            .keep(restaurants.into_iter().next())
            .ok_or_else(|| Notice::Placeholder("The dashboard was closed".to_string()))?;

        self.restaurant.write().clone_from(&restaurant);

        Ok(restaurant)
    }

    /// Create the restaurant, or update it when one is already loaded.
    ///
    /// # Errors
    ///
    /// Returns why nothing was saved.
    pub async fn save_restaurant(
        &self,
        form: &RestaurantForm,
    ) -> Result<&'static str, OwnerError> {
        let details = form.validate().map_err(OwnerError::Invalid)?;

        let _guard = self
            .saving
            .try_acquire(PendingSave::Restaurant)
            .ok_or(OwnerError::Saving)?;

        let saved = match self.restaurant_id() {
            Some(id) => self.service.update_restaurant(id, details).await,
            None => self.service.create_restaurant(details).await,
        }
        .map_err(|error| OwnerError::api(error, "Error saving restaurant"))?;

        let saved = self.lifetime.keep(saved).ok_or(OwnerError::Closed)?;

        match saved {
            Some(restaurant) => {
                info!(restaurant = %restaurant.id, "restaurant saved");
                *self.restaurant.write() = Some(restaurant);
            }
            None => {
                if let Err(notice) = self.load().await {
                    warn!(%notice, "could not reload restaurant");
                }
            }
        }

        Ok("Restaurant saved successfully!")
    }

    /// Remove the managed restaurant.
    ///
    /// # Errors
    ///
    /// Returns why the restaurant was not removed.
    pub async fn delete_restaurant(&self) -> Result<(), OwnerError> {
        let id = self.restaurant_id().ok_or(OwnerError::NoRestaurant)?;

        let _guard = self
            .saving
            .try_acquire(PendingSave::Restaurant)
            .ok_or(OwnerError::Saving)?;

        self.service
            .delete_restaurant(id)
            .await
            .map_err(|error| OwnerError::api(error, "Error deleting restaurant"))?;

        info!(restaurant = %id, "restaurant deleted");

        *self.restaurant.write() = None;
        self.menu.write().clear();
        self.orders.write().clear();

        Ok(())
    }

    /// Fetch the menu of the managed restaurant.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn refresh_menu(&self) -> Result<Vec<MenuItem>, Notice> {
        let restaurant = self
            .restaurant_id()
            .ok_or_else(|| Notice::Placeholder(NO_RESTAURANT.to_string()))?;

        let items = self
            .service
            .menu_items(restaurant)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch menu items"))?;

        let items = self
            .lifetime
            .keep(items)
            .ok_or_else(|| Notice::Placeholder("The dashboard was closed".to_string()))?;

        self.menu.write().clone_from(&items);

        Ok(items)
    }

    async fn after_menu_change(&self) {
        if let Err(notice) = self.refresh_menu().await {
            warn!(%notice, "could not refresh the menu");
        }
    }

    /// Add an item to the menu, then refresh it.
    ///
    /// # Errors
    ///
    /// Returns why the item was not added.
    pub async fn add_menu_item(
        &self,
        form: &MenuItemForm,
    ) -> Result<Option<MenuItem>, OwnerError> {
        let restaurant = self.restaurant_id().ok_or(OwnerError::NoRestaurant)?;
        let details = form.validate().map_err(OwnerError::Invalid)?;

        let _guard = self
            .saving
            .try_acquire(PendingSave::NewMenuItem)
            .ok_or(OwnerError::Saving)?;

        let created = self
            .service
            .create_menu_item(restaurant, details)
            .await
            .map_err(|error| OwnerError::api(error, "Error saving menu item"))?;

        info!(%restaurant, "menu item added");

        self.after_menu_change().await;

        self.lifetime.keep(created).ok_or(OwnerError::Closed)
    }

    /// Replace an item's details, then refresh the menu.
    ///
    /// # Errors
    ///
    /// Returns why the item was not updated.
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        form: &MenuItemForm,
    ) -> Result<Option<MenuItem>, OwnerError> {
        let details = form.validate().map_err(OwnerError::Invalid)?;

        let _guard = self
            .menu_busy
            .try_acquire(id)
            .ok_or(OwnerError::MenuItemBusy(id))?;

        let updated = self
            .service
            .update_menu_item(id, details)
            .await
            .map_err(|error| OwnerError::api(error, "Error saving menu item"))?;

        info!(item = %id, "menu item updated");

        self.after_menu_change().await;

        self.lifetime.keep(updated).ok_or(OwnerError::Closed)
    }

    /// Remove an item from the menu.
    ///
    /// # Errors
    ///
    /// Returns why the item was not removed.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<&'static str, OwnerError> {
        let _guard = self
            .menu_busy
            .try_acquire(id)
            .ok_or(OwnerError::MenuItemBusy(id))?;

        self.service
            .delete_menu_item(id)
            .await
            .map_err(|error| OwnerError::api(error, "Error deleting menu item"))?;

        info!(item = %id, "menu item deleted");

        self.menu.write().retain(|item| item.id != id);

        self.lifetime
            .keep("Menu item deleted successfully!")
            .ok_or(OwnerError::Closed)
    }

    /// Fetch the orders placed at the managed restaurant.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn refresh_orders(&self) -> Result<Vec<OwnerOrder>, Notice> {
        let restaurant = self
            .restaurant_id()
            .ok_or_else(|| Notice::Placeholder("No restaurant found.".to_string()))?;

        let orders = self
            .service
            .restaurant_orders(restaurant)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch orders"))?;

        let orders = self
            .lifetime
            .keep(orders)
            .ok_or_else(|| Notice::Placeholder("The dashboard was closed".to_string()))?;

        self.orders.write().clone_from(&orders);

        Ok(orders)
    }

    /// Accept or reject a pending order. Returns the status it now shows.
    ///
    /// # Errors
    ///
    /// Returns why the decision was not stored.
    pub async fn decide(
        &self,
        id: OrderId,
        decision: OwnerDecision,
    ) -> Result<OrderStatus, OwnerError> {
        let current = self
            .orders
            .read()
            .iter()
            .find(|order| order.id == id)
            .map(|order| order.status.clone());

        if let Some(status) = current.filter(|status| *status != OrderStatus::Pending) {
            return Err(OwnerError::NotPending { id, status });
        }

        let _guard = self
            .order_busy
            .try_acquire(id)
            .ok_or(OwnerError::OrderBusy(id))?;

        self.service
            .decide(id, decision)
            .await
            .map_err(|error| OwnerError::api(error, "Failed to update order status"))?;

        info!(order = %id, %decision, "order decided");

        let status = decision.status();

        if let Some(order) = self.orders.write().iter_mut().find(|order| order.id == id) {
            order.status = status.clone();
        }

        self.lifetime.keep(status).ok_or(OwnerError::Closed)
    }
}
