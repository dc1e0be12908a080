//! Restaurant and menu browsing.
//!
//! Both views hold a [`SearchQuery`] and ask the server for one page at a
//! time. A failed search shows an empty page with a placeholder.

use std::sync::Arc;

use parking_lot::Mutex;
use platter::{
    restaurants::{MenuItem, Restaurant, RestaurantId},
    search::{Page, SearchQuery},
};
use tracing::warn;

use crate::{errors::Notice, services::RestaurantsService, views::ViewLifetime};

/// A page of results plus the placeholder shown when the search failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<T> {
    pub page: Page<T>,
    pub notice: Option<Notice>,
}

impl<T> SearchResults<T> {
    fn failed(notice: Notice) -> Self {
        Self {
            page: Page::empty(),
            notice: Some(notice),
        }
    }
}

/// Restaurant list with search, cuisine filter and paging.
pub struct RestaurantBrowser {
    service: Arc<dyn RestaurantsService>,
    query: Mutex<SearchQuery>,
    lifetime: ViewLifetime,
}

impl RestaurantBrowser {
    #[must_use]
    pub fn new(service: Arc<dyn RestaurantsService>) -> Self {
        Self {
            service,
            query: Mutex::new(SearchQuery::restaurants()),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    #[must_use]
    pub fn query(&self) -> SearchQuery {
        self.query.lock().clone()
    }

    /// Change filters. Setters on the query reset the page themselves.
    pub fn update(&self, change: impl FnOnce(&mut SearchQuery)) {
        change(&mut self.query.lock());
    }

    /// Run the current query. `None` once the view has closed.
    pub async fn search(&self) -> Option<SearchResults<Restaurant>> {
        let request = self.query.lock().restaurant_request();

        let results = match self.service.search_restaurants(request).await {
            Ok(page) => SearchResults { page, notice: None },
            Err(error) => {
                warn!(%error, "restaurant search failed");
                SearchResults::failed(Notice::for_fetch(&error, "Failed to load restaurants"))
            }
        };

        self.lifetime.keep(results)
    }

    /// Cuisine names for the filter. Empty when they cannot be loaded.
    pub async fn cuisines(&self) -> Vec<String> {
        self.service.cuisines().await.unwrap_or_else(|error| {
            warn!(%error, "could not load cuisines");
            Vec::new()
        })
    }

    /// Home page highlights.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn top_rated(&self, limit: u32) -> Result<Vec<Restaurant>, Notice> {
        self.service
            .top_rated(limit)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to load restaurants"))
    }
}

/// One restaurant's page: its details and a searchable menu.
pub struct MenuBrowser {
    service: Arc<dyn RestaurantsService>,
    restaurant: RestaurantId,
    query: Mutex<SearchQuery>,
    lifetime: ViewLifetime,
}

impl MenuBrowser {
    #[must_use]
    pub fn new(service: Arc<dyn RestaurantsService>, restaurant: RestaurantId) -> Self {
        Self {
            service,
            restaurant,
            query: Mutex::new(SearchQuery::menu()),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    #[must_use]
    pub fn query(&self) -> SearchQuery {
        self.query.lock().clone()
    }

    pub fn update(&self, change: impl FnOnce(&mut SearchQuery)) {
        change(&mut self.query.lock());
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn restaurant(&self) -> Result<Restaurant, Notice> {
        self.service
            .restaurant(self.restaurant)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Restaurant not found"))
    }

    /// Menu categories for the filter. Empty when they cannot be loaded.
    pub async fn categories(&self) -> Vec<String> {
        self.service
            .menu_categories(self.restaurant)
            .await
            .unwrap_or_else(|error| {
                warn!(%error, restaurant = %self.restaurant, "could not load menu categories");
                Vec::new()
            })
    }

    /// Run the current query against this restaurant's menu.
    pub async fn search(&self) -> Option<SearchResults<MenuItem>> {
        let request = self.query.lock().menu_request(Some(self.restaurant));

        let results = match self.service.search_menu(request).await {
            Ok(page) => SearchResults { page, notice: None },
            Err(error) => {
                warn!(%error, restaurant = %self.restaurant, "menu search failed");
                SearchResults::failed(Notice::for_fetch(&error, "Failed to load menu items"))
            }
        };

        self.lifetime.keep(results)
    }
}
