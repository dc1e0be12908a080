//! Reviews

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::{
    forms::FieldErrors, ids::TypedId, orders::OrderId, restaurants::RestaurantId,
    wire::null_as_default,
};

/// Review Id
pub type ReviewId = TypedId<Review>;

/// Longest comment the backend accepts.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// What a review is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewTarget {
    #[default]
    Restaurant,
    DeliveryPartner,
    Order,
    #[serde(other)]
    Other,
}

/// A rating between one and five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stars(u8);

impl Stars {
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if matches!(value, 1..=5) {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A review being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub order_id: Option<OrderId>,
    pub rating: u8,
    pub comment: String,
    pub target: ReviewTarget,
    pub food_rating: Option<u8>,
    pub delivery_rating: Option<u8>,
    pub service_rating: Option<u8>,
    pub anonymous: bool,
}

impl ReviewDraft {
    #[must_use]
    pub fn for_order(order_id: OrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::default()
        }
    }

    /// Check the draft and build the submission body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<ReviewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.order_id.is_none() {
            errors.push("orderId", "Order ID is required");
        }

        let rating = Stars::new(self.rating);

        if rating.is_none() {
            errors.push("rating", "Rating must be between 1 and 5");
        }

        let comment = self.comment.trim();

        if comment.chars().count() > MAX_COMMENT_CHARS {
            errors.push("comment", "Comment cannot exceed 1000 characters");
        }

        let food_rating = sub_rating(
            self.food_rating,
            "foodRating",
            "Food rating must be between 1 and 5",
            &mut errors,
        );
        let delivery_rating = sub_rating(
            self.delivery_rating,
            "deliveryRating",
            "Delivery rating must be between 1 and 5",
            &mut errors,
        );
        let service_rating = sub_rating(
            self.service_rating,
            "serviceRating",
            "Service rating must be between 1 and 5",
            &mut errors,
        );

        let (Some(order_id), Some(rating)) = (self.order_id, rating) else {
            return Err(errors);
        };

        errors.into_result(ReviewRequest {
            order_id,
            rating,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
            review_type: self.target,
            food_rating,
            delivery_rating,
            service_rating,
            is_anonymous: self.anonymous,
        })
    }
}

fn sub_rating(
    value: Option<u8>,
    field: &'static str,
    message: &'static str,
    errors: &mut FieldErrors,
) -> Option<Stars> {
    let value = value?;
    let stars = Stars::new(value);

    if stars.is_none() {
        errors.push(field, message);
    }

    stars
}

/// Body of `POST /customer/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub order_id: OrderId,
    pub rating: Stars,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub review_type: ReviewTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_rating: Option<Stars>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_rating: Option<Stars>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_rating: Option<Stars>,
    pub is_anonymous: bool,
}

/// Review as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub rating: Option<u8>,
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_type: ReviewTarget,
    pub food_rating: Option<u8>,
    pub delivery_rating: Option<u8>,
    pub service_rating: Option<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_anonymous: bool,
    pub created_at: Option<DateTime>,
    pub customer_name: Option<String>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
    pub order_id: Option<OrderId>,
    pub order_number: Option<String>,
    pub delivery_partner_name: Option<String>,
}

impl Review {
    /// Author line, hidden for anonymous reviews.
    #[must_use]
    pub fn author(&self) -> &str {
        if self.is_anonymous {
            return "Anonymous";
        }

        self.customer_name.as_deref().unwrap_or("Customer")
    }

    /// `★★★☆☆` for a three-star review.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.unwrap_or_default().min(5));

        "★".repeat(filled) + &"☆".repeat(5 - filled)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn valid_draft_serializes_for_backend() -> TestResult {
        let draft = ReviewDraft {
            rating: 4,
            comment: " Hot and fresh ".to_string(),
            food_rating: Some(5),
            ..ReviewDraft::for_order(OrderId::new(12))
        };

        let request = draft.validate().map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "orderId": 12,
                "rating": 4,
                "comment": "Hot and fresh",
                "reviewType": "RESTAURANT",
                "foodRating": 5,
                "isAnonymous": false
            })
        );

        Ok(())
    }

    #[test]
    fn ratings_outside_one_to_five_are_rejected() {
        let draft = ReviewDraft {
            rating: 0,
            service_rating: Some(6),
            ..ReviewDraft::for_order(OrderId::new(1))
        };

        let errors = draft.validate().err().unwrap_or_default();

        assert_eq!(errors.get("rating"), Some("Rating must be between 1 and 5"));
        assert_eq!(errors.get("serviceRating"), Some("Service rating must be between 1 and 5"));
    }

    #[test]
    fn long_comment_is_rejected() {
        let draft = ReviewDraft {
            rating: 3,
            comment: "x".repeat(MAX_COMMENT_CHARS + 1),
            ..ReviewDraft::for_order(OrderId::new(1))
        };

        let errors = draft.validate().err().unwrap_or_default();

        assert_eq!(errors.len(), 1);
        assert!(errors.get("comment").is_some());
    }

    #[test]
    fn anonymous_reviews_hide_the_author() -> TestResult {
        let review: Review = serde_json::from_str(
            r#"{"id": 3, "rating": 3, "isAnonymous": true, "customerName": "Asha", "reviewType": "SOMETHING"}"#,
        )?;

        assert_eq!(review.author(), "Anonymous");
        assert_eq!(review.stars(), "★★★☆☆");
        assert_eq!(review.review_type, ReviewTarget::Other);

        Ok(())
    }
}
