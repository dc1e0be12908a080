//! Delivery partner dashboard.

use std::sync::Arc;

use parking_lot::RwLock;
use platter::{
    busy::BusyFlags,
    delivery::{DeliveryOrder, DeliveryOrderId, DeliveryStatus, FeedbackForm, PartnerProfile},
    forms::FieldErrors,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    errors::{ApiError, Notice},
    services::DeliveryService,
    views::ViewLifetime,
};

#[derive(Debug, Error)]
pub enum DeliveryActionError {
    #[error("an action on order {0} is already in progress")]
    Busy(DeliveryOrderId),

    #[error("order {id} cannot move on from {status}")]
    NoNextStatus {
        id: DeliveryOrderId,
        status: DeliveryStatus,
    },

    #[error("the dashboard was closed")]
    Closed,

    #[error("the form has invalid fields")]
    Invalid(FieldErrors),

    #[error("delivery request failed")]
    Api {
        #[source]
        source: ApiError,
        fallback: &'static str,
    },
}

impl DeliveryActionError {
    fn api(source: ApiError, fallback: &'static str) -> Self {
        warn!(error = %source, "delivery action failed");

        Self::Api { source, fallback }
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Api { source, fallback } => Some(Notice::for_mutation(source, fallback)),
            Self::Invalid(errors) => Some(Notice::Inline(errors.clone())),
            Self::Busy(_) | Self::NoNextStatus { .. } | Self::Closed => None,
        }
    }
}

/// Pending orders, the partner's active deliveries, and their settings.
pub struct DeliveryBoard {
    service: Arc<dyn DeliveryService>,
    busy: BusyFlags<DeliveryOrderId>,
    pending: RwLock<Vec<DeliveryOrder>>,
    lifetime: ViewLifetime,
}

impl DeliveryBoard {
    #[must_use]
    pub fn new(service: Arc<dyn DeliveryService>) -> Self {
        Self {
            service,
            busy: BusyFlags::new(),
            pending: RwLock::new(Vec::new()),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Pending orders as last fetched.
    #[must_use]
    pub fn pending(&self) -> Vec<DeliveryOrder> {
        self.pending.read().clone()
    }

    #[must_use]
    pub fn is_busy(&self, id: &DeliveryOrderId) -> bool {
        self.busy.is_busy(id)
    }

    /// Fetch the pending orders.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn refresh(&self) -> Result<Vec<DeliveryOrder>, Notice> {
        let orders = self
            .service
            .pending_orders()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch orders"))?;

        let orders = self
            .lifetime
            .keep(orders)
            .ok_or_else(|| Notice::Placeholder("The dashboard was closed".to_string()))?;

        self.pending.write().clone_from(&orders);

        Ok(orders)
    }

    /// Take a pending order, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns why the order was not accepted.
    pub async fn accept(&self, id: DeliveryOrderId) -> Result<String, DeliveryActionError> {
        let _guard = self
            .busy
            .try_acquire(id.clone())
            .ok_or_else(|| DeliveryActionError::Busy(id.clone()))?;

        let confirmation = self
            .service
            .accept(id.clone())
            .await
            .map_err(|error| DeliveryActionError::api(error, "Failed to accept order"))?;

        info!(order = %id, "order accepted");

        self.after_decision(confirmation).await
    }

    /// Decline a pending order, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns why the order was not rejected.
    pub async fn reject(&self, id: DeliveryOrderId) -> Result<String, DeliveryActionError> {
        let _guard = self
            .busy
            .try_acquire(id.clone())
            .ok_or_else(|| DeliveryActionError::Busy(id.clone()))?;

        let confirmation = self
            .service
            .reject(id.clone())
            .await
            .map_err(|error| DeliveryActionError::api(error, "Failed to reject order"))?;

        info!(order = %id, "order rejected");

        self.after_decision(confirmation).await
    }

    async fn after_decision(&self, confirmation: String) -> Result<String, DeliveryActionError> {
        if let Err(notice) = self.refresh().await {
            warn!(%notice, "could not refresh pending orders");
        }

        self.lifetime
            .keep(confirmation)
            .ok_or(DeliveryActionError::Closed)
    }

    /// Move an accepted order one step along. Returns the new status.
    ///
    /// # Errors
    ///
    /// Returns why the status did not change.
    pub async fn advance(
        &self,
        order: &DeliveryOrder,
    ) -> Result<DeliveryStatus, DeliveryActionError> {
        let current = order.status();
        let next = current
            .next()
            .ok_or_else(|| DeliveryActionError::NoNextStatus {
                id: order.id.clone(),
                status: current.clone(),
            })?;

        let _guard = self
            .busy
            .try_acquire(order.id.clone())
            .ok_or_else(|| DeliveryActionError::Busy(order.id.clone()))?;

        self.service
            .update_status(order.id.clone(), next.clone())
            .await
            .map_err(|error| DeliveryActionError::api(error, "Failed to update order status"))?;

        info!(order = %order.id, from = %current, to = %next, "delivery status updated");

        self.lifetime.keep(next).ok_or(DeliveryActionError::Closed)
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn order(&self, id: DeliveryOrderId) -> Result<DeliveryOrder, Notice> {
        self.service
            .order(id)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Order not found"))
    }

    /// Orders the partner has completed.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn history(&self) -> Result<Vec<DeliveryOrder>, Notice> {
        self.service
            .history()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch delivery history"))
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn availability(&self) -> Result<bool, Notice> {
        self.service
            .availability()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch availability"))
    }

    /// Store a new availability and return what the server kept.
    ///
    /// # Errors
    ///
    /// Returns why the flag did not change.
    pub async fn set_availability(&self, is_available: bool) -> Result<bool, DeliveryActionError> {
        self.service
            .set_availability(is_available)
            .await
            .map_err(|error| DeliveryActionError::api(error, "Failed to update availability"))
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn profile(&self) -> Result<PartnerProfile, Notice> {
        self.service
            .profile()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch profile"))
    }

    /// # Errors
    ///
    /// Returns why the profile was not saved.
    pub async fn update_profile(
        &self,
        profile: PartnerProfile,
    ) -> Result<PartnerProfile, DeliveryActionError> {
        self.service.update_profile(profile).await.map_err(|error| {
            DeliveryActionError::api(error, "Failed to update profile. Please try again.")
        })
    }

    /// Send feedback about a delivery. Returns the confirmation to show.
    ///
    /// # Errors
    ///
    /// Returns why the feedback was not stored.
    pub async fn submit_feedback(
        &self,
        form: &FeedbackForm,
    ) -> Result<&'static str, DeliveryActionError> {
        let feedback = form.validate().map_err(DeliveryActionError::Invalid)?;
        let order = feedback.order_id.clone();

        self.service
            .submit_feedback(feedback)
            .await
            .map_err(|error| DeliveryActionError::api(error, "Failed to submit feedback."))?;

        info!(%order, "delivery feedback submitted");

        Ok("Feedback submitted successfully!")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{services::MockDeliveryService, test};

    #[tokio::test]
    async fn accept_refreshes_pending_orders() -> TestResult {
        let mut service = MockDeliveryService::new();
        service
            .expect_accept()
            .once()
            .withf(|id| id.as_str() == "a1")
            .return_once(|_| Ok("Order accepted".to_string()));
        service
            .expect_pending_orders()
            .once()
            .return_once(|| Ok(vec![test::delivery_order("b2", "PENDING")]));

        let board = DeliveryBoard::new(Arc::new(service));
        let confirmation = board.accept(DeliveryOrderId::from("a1")).await?;

        assert_eq!(confirmation, "Order accepted");
        assert_eq!(board.pending().len(), 1);
        assert!(!board.is_busy(&DeliveryOrderId::from("a1")));

        Ok(())
    }

    #[tokio::test]
    async fn busy_order_refuses_a_second_action() -> TestResult {
        let mut service = MockDeliveryService::new();
        service.expect_reject().never();

        let board = DeliveryBoard::new(Arc::new(service));
        let _held = board.busy.try_acquire(DeliveryOrderId::from("a1"));

        let result = board.reject(DeliveryOrderId::from("a1")).await;

        assert!(matches!(result, Err(DeliveryActionError::Busy(_))));

        Ok(())
    }

    #[tokio::test]
    async fn advance_sends_the_next_status() -> TestResult {
        let mut service = MockDeliveryService::new();
        service
            .expect_update_status()
            .once()
            .withf(|id, status| id.as_str() == "a1" && *status == DeliveryStatus::PickedUp)
            .return_once(|_, _| Ok("Status updated".to_string()));

        let board = DeliveryBoard::new(Arc::new(service));
        let next = board.advance(&test::delivery_order("a1", "accepted")).await?;

        assert_eq!(next, DeliveryStatus::PickedUp);

        Ok(())
    }

    #[tokio::test]
    async fn delivered_orders_do_not_advance() -> TestResult {
        let mut service = MockDeliveryService::new();
        service.expect_update_status().never();

        let board = DeliveryBoard::new(Arc::new(service));
        let result = board.advance(&test::delivery_order("a1", "DELIVERED")).await;

        assert!(matches!(result, Err(DeliveryActionError::NoNextStatus { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn availability_failure_is_an_alert() -> TestResult {
        let mut service = MockDeliveryService::new();
        service.expect_set_availability().once().return_once(|_| {
            Err(ApiError::Rejected {
                status: Some(500),
                message: None,
            })
        });

        let board = DeliveryBoard::new(Arc::new(service));
        let error = board
            .set_availability(false)
            .await
            .err()
            .ok_or("update should fail")?;

        assert_eq!(
            error.notice(),
            Some(Notice::Alert("Failed to update availability".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn feedback_is_sent_for_the_trimmed_order() -> TestResult {
        let mut service = MockDeliveryService::new();
        service
            .expect_submit_feedback()
            .once()
            .withf(|feedback| feedback.order_id.as_str() == "a1" && feedback.rating.get() == 4)
            .return_once(|_| Ok(()));

        let board = DeliveryBoard::new(Arc::new(service));
        let form = FeedbackForm {
            order_id: " a1 ".to_string(),
            rating: 4,
            comments: "Gate was locked".to_string(),
        };

        assert_eq!(
            board.submit_feedback(&form).await?,
            "Feedback submitted successfully!"
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_feedback_stays_local() -> TestResult {
        let mut service = MockDeliveryService::new();
        service.expect_submit_feedback().never();

        let board = DeliveryBoard::new(Arc::new(service));
        let error = board
            .submit_feedback(&FeedbackForm::default())
            .await
            .err()
            .ok_or("missing order id should be refused")?;

        let Some(Notice::Inline(errors)) = error.notice() else {
            return Err("expected inline errors".into());
        };

        assert_eq!(errors.get("orderId"), Some("Order ID is required."));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_feedback_is_an_alert() -> TestResult {
        let mut service = MockDeliveryService::new();
        service.expect_submit_feedback().once().return_once(|_| {
            Err(ApiError::Rejected {
                status: Some(500),
                message: None,
            })
        });

        let board = DeliveryBoard::new(Arc::new(service));
        let form = FeedbackForm {
            order_id: "a1".to_string(),
            ..FeedbackForm::default()
        };

        let error = board
            .submit_feedback(&form)
            .await
            .err()
            .ok_or("server failure should surface")?;

        assert_eq!(
            error.notice(),
            Some(Notice::Alert("Failed to submit feedback.".to_string()))
        );

        Ok(())
    }
}
