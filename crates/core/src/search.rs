//! Server-side search and filtering.
//!
//! Restaurants and menu items are filtered with one query shape. Changing
//! any filter sends the view back to the first page.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{money::Amount, restaurants::RestaurantId, wire::null_as_default};

/// Restaurants shown per page.
pub const RESTAURANT_PAGE_SIZE: u32 = 12;

/// Menu items shown per page.
pub const MENU_PAGE_SIZE: u32 = 20;

/// Sort key understood by the search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    Rating,
    DeliveryFee,
    AvgDeliveryTime,
    Price,
    PrepTime,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Filters, sort order and page of a search view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    search_term: Option<String>,
    category: Option<String>,
    min_rating: Option<Decimal>,
    max_fee: Option<Amount>,
    sort_by: SortBy,
    sort_direction: SortDirection,
    page: u32,
    size: u32,
    defaults: (SortBy, SortDirection),
}

impl SearchQuery {
    fn with_defaults(sort_by: SortBy, sort_direction: SortDirection, size: u32) -> Self {
        Self {
            search_term: None,
            category: None,
            min_rating: None,
            max_fee: None,
            sort_by,
            sort_direction,
            page: 0,
            size,
            defaults: (sort_by, sort_direction),
        }
    }

    /// Best rated restaurants first.
    #[must_use]
    pub fn restaurants() -> Self {
        Self::with_defaults(SortBy::Rating, SortDirection::Desc, RESTAURANT_PAGE_SIZE)
    }

    /// Menu items by name.
    #[must_use]
    pub fn menu() -> Self {
        Self::with_defaults(SortBy::Name, SortDirection::Asc, MENU_PAGE_SIZE)
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn sort(&self) -> (SortBy, SortDirection) {
        (self.sort_by, self.sort_direction)
    }

    /// Free-text filter; blank input clears it.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = non_blank(term);
        self.page = 0;
    }

    /// Cuisine for restaurants, menu category for items.
    pub fn set_category(&mut self, category: &str) {
        self.category = non_blank(category);
        self.page = 0;
    }

    pub fn set_min_rating(&mut self, rating: Option<Decimal>) {
        self.min_rating = rating;
        self.page = 0;
    }

    /// Delivery fee cap for restaurants, price cap for items.
    pub fn set_max_fee(&mut self, fee: Option<Amount>) {
        self.max_fee = fee;
        self.page = 0;
    }

    pub fn set_sort(&mut self, sort_by: SortBy, sort_direction: SortDirection) {
        self.sort_by = sort_by;
        self.sort_direction = sort_direction;
        self.page = 0;
    }

    /// Move to another page, keeping every filter.
    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Drop every filter and go back to the default sort.
    pub fn clear_filters(&mut self) {
        let (sort_by, sort_direction) = self.defaults;

        *self = Self::with_defaults(sort_by, sort_direction, self.size);
    }

    /// Body for `POST /customer/restaurants/search`.
    #[must_use]
    pub fn restaurant_request(&self) -> RestaurantSearchRequest {
        RestaurantSearchRequest {
            search_term: self.search_term.clone(),
            cuisine_type: self.category.clone(),
            min_rating: self.min_rating,
            max_delivery_fee: self.max_fee,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page: self.page,
            size: self.size,
        }
    }

    /// Body for `POST /customer/menu/search`.
    #[must_use]
    pub fn menu_request(&self, restaurant_id: Option<RestaurantId>) -> MenuSearchRequest {
        MenuSearchRequest {
            restaurant_id,
            search_term: self.search_term.clone(),
            category: self.category.clone(),
            min_rating: self.min_rating,
            max_price: self.max_fee,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page: self.page,
            size: self.size,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_fee: Option<Amount>,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Amount>,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub size: u32,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(alias = "content", default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// What a failed search degrades to.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            total_elements: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a page after `current` exists.
    #[must_use]
    pub const fn has_next(&self, current: u32) -> bool {
        current.saturating_add(1) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn changing_a_filter_resets_the_page() {
        let mut query = SearchQuery::restaurants();

        query.set_page(3);
        query.set_category("South Indian");

        assert_eq!(query.page(), 0);
        assert_eq!(query.category(), Some("South Indian"));

        query.set_page(2);
        query.set_sort(SortBy::DeliveryFee, SortDirection::Asc);

        assert_eq!(query.page(), 0);
    }

    #[test]
    fn clearing_filters_restores_defaults() {
        let mut query = SearchQuery::menu();

        query.set_search_term("paneer");
        query.set_sort(SortBy::Price, SortDirection::Desc);
        query.set_page(4);
        query.clear_filters();

        assert_eq!(query, SearchQuery::menu());
    }

    #[test]
    fn blank_search_term_is_no_filter() {
        let mut query = SearchQuery::restaurants();

        query.set_search_term("   ");

        assert_eq!(query.search_term(), None);
    }

    #[test]
    fn restaurant_request_uses_backend_field_names() -> TestResult {
        let mut query = SearchQuery::restaurants();

        query.set_category("Chinese");
        query.set_max_fee(Some(Amount::from_minor(40_00)));

        assert_eq!(
            serde_json::to_value(query.restaurant_request())?,
            json!({
                "cuisineType": "Chinese",
                "maxDeliveryFee": 40.0,
                "sortBy": "rating",
                "sortDirection": "desc",
                "page": 0,
                "size": 12
            })
        );

        Ok(())
    }

    #[test]
    fn menu_request_scopes_to_restaurant() -> TestResult {
        let query = SearchQuery::menu();

        assert_eq!(
            serde_json::to_value(query.menu_request(Some(RestaurantId::new(8))))?,
            json!({
                "restaurantId": 8,
                "sortBy": "name",
                "sortDirection": "asc",
                "page": 0,
                "size": 20
            })
        );

        Ok(())
    }

    #[test]
    fn page_accepts_backend_content_field() -> TestResult {
        let page: Page<u32> =
            serde_json::from_str(r#"{"content": [1, 2], "totalPages": 3, "totalElements": 30}"#)?;

        assert_eq!(page.items, [1, 2]);
        assert!(page.has_next(1));
        assert!(!page.has_next(2));

        Ok(())
    }
}
