//! Review form and review lists.

use std::sync::Arc;

use platter::{
    forms::FieldErrors,
    orders::Order,
    restaurants::RestaurantId,
    reviews::{Review, ReviewDraft},
};
use thiserror::Error;
use tracing::warn;

use crate::{
    errors::{ApiError, Notice},
    services::ReviewsService,
};

const SUBMIT_FAILED: &str = "Failed to submit review. Please try again.";

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("this order cannot be reviewed")]
    NotReviewable,

    #[error("the review has invalid fields")]
    Invalid(FieldErrors),

    #[error("failed to submit the review")]
    Api(#[source] ApiError),
}

impl ReviewError {
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::NotReviewable => {
                Notice::Alert("Only delivered orders can be reviewed, once.".to_string())
            }
            Self::Invalid(errors) => Notice::Inline(errors.clone()),
            Self::Api(source) => Notice::for_mutation(source, SUBMIT_FAILED),
        }
    }
}

pub struct ReviewsView {
    service: Arc<dyn ReviewsService>,
}

impl ReviewsView {
    #[must_use]
    pub fn new(service: Arc<dyn ReviewsService>) -> Self {
        Self { service }
    }

    /// Submit `draft` for `order`, which must be delivered and not yet
    /// reviewed. The draft must be for that same order.
    ///
    /// # Errors
    ///
    /// Returns why nothing was stored.
    pub async fn submit(
        &self,
        order: &Order,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>, ReviewError> {
        if !order.can_review() || draft.order_id != Some(order.id) {
            return Err(ReviewError::NotReviewable);
        }

        let request = draft.validate().map_err(ReviewError::Invalid)?;

        self.service.submit(request).await.map_err(|error| {
            warn!(%error, order = %order.id, "review submission failed");
            ReviewError::Api(error)
        })
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn mine(&self) -> Result<Vec<Review>, Notice> {
        self.service
            .my_reviews()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch reviews"))
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn for_restaurant(&self, id: RestaurantId) -> Result<Vec<Review>, Notice> {
        self.service
            .restaurant_reviews(id)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch reviews"))
    }
}

#[cfg(test)]
mod tests {
    use platter::{orders::OrderId, reviews::Stars};
    use testresult::TestResult;

    use super::*;
    use crate::{services::MockReviewsService, test};

    fn draft(order_id: OrderId, rating: u8) -> ReviewDraft {
        ReviewDraft {
            rating,
            comment: "  Hot and on time  ".to_string(),
            ..ReviewDraft::for_order(order_id)
        }
    }

    #[tokio::test]
    async fn delivered_order_review_is_submitted() -> TestResult {
        let mut service = MockReviewsService::new();
        service
            .expect_submit()
            .once()
            .withf(|request| {
                request.order_id == OrderId::new(3)
                    && Some(request.rating) == Stars::new(5)
                    && request.comment.as_deref() == Some("Hot and on time")
            })
            .return_once(|_| Ok(None));

        let view = ReviewsView::new(Arc::new(service));
        let order = test::reviewable_order(3);

        view.submit(&order, &draft(order.id, 5)).await?;

        Ok(())
    }

    #[tokio::test]
    async fn undelivered_order_cannot_be_reviewed() -> TestResult {
        let mut service = MockReviewsService::new();
        service.expect_submit().never();

        let view = ReviewsView::new(Arc::new(service));
        let order = test::order(3, "PREPARING");

        let result = view.submit(&order, &draft(order.id, 5)).await;

        assert!(matches!(result, Err(ReviewError::NotReviewable)));

        Ok(())
    }

    #[tokio::test]
    async fn draft_for_another_order_is_refused() -> TestResult {
        let mut service = MockReviewsService::new();
        service.expect_submit().never();

        let view = ReviewsView::new(Arc::new(service));
        let order = test::reviewable_order(3);

        let result = view.submit(&order, &draft(OrderId::new(4), 5)).await;

        assert!(matches!(result, Err(ReviewError::NotReviewable)));

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_rating_stays_local() -> TestResult {
        let mut service = MockReviewsService::new();
        service.expect_submit().never();

        let view = ReviewsView::new(Arc::new(service));
        let order = test::reviewable_order(3);

        let error = view
            .submit(&order, &draft(order.id, 6))
            .await
            .err()
            .ok_or("rating of six should be refused")?;

        let Notice::Inline(errors) = error.notice() else {
            return Err("expected inline errors".into());
        };

        assert_eq!(errors.get("rating"), Some("Rating must be between 1 and 5"));

        Ok(())
    }
}
