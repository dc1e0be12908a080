//! Order list and order detail controllers.
//!
//! Statuses are only observed. Cancelling sends the request and, once the
//! server confirms, re-fetches the order rather than editing it locally.

use std::sync::Arc;

use platter::{
    busy::BusyFlags,
    orders::{Order, OrderId},
};
use thiserror::Error;
use tracing::warn;

use crate::{
    errors::{ApiError, Notice},
    services::OrdersService,
    views::ViewLifetime,
};

const CANCEL_FAILED: &str = "Failed to cancel order";

#[derive(Debug, Error)]
pub enum OrderActionError {
    #[error("this order is already being cancelled")]
    Busy,

    #[error("order {0} can no longer be cancelled")]
    NotCancellable(OrderId),

    #[error("the order view was closed")]
    Closed,

    #[error("failed to cancel the order")]
    Api(#[source] ApiError),
}

impl OrderActionError {
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Api(source) => Some(Notice::for_mutation(source, CANCEL_FAILED)),
            Self::Busy | Self::NotCancellable(_) | Self::Closed => None,
        }
    }
}

pub struct OrdersView {
    service: Arc<dyn OrdersService>,
    cancelling: BusyFlags<OrderId>,
    lifetime: ViewLifetime,
}

impl OrdersView {
    #[must_use]
    pub fn new(service: Arc<dyn OrdersService>) -> Self {
        Self {
            service,
            cancelling: BusyFlags::new(),
            lifetime: ViewLifetime::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    #[must_use]
    pub fn is_cancelling(&self, id: OrderId) -> bool {
        self.cancelling.is_busy(&id)
    }

    /// Every order of the customer.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn list(&self) -> Result<Vec<Order>, Notice> {
        let orders = self
            .service
            .orders()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch orders"))?;

        self.keep(orders)
    }

    /// Orders still on their way.
    ///
    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn active(&self) -> Result<Vec<Order>, Notice> {
        let orders = self
            .service
            .active_orders()
            .await
            .map_err(|error| Notice::for_fetch(&error, "Failed to fetch orders"))?;

        self.keep(orders)
    }

    /// # Errors
    ///
    /// Returns the placeholder to show instead.
    pub async fn detail(&self, id: OrderId) -> Result<Order, Notice> {
        let order = self
            .service
            .order(id)
            .await
            .map_err(|error| Notice::for_fetch(&error, "Order not found"))?;

        self.keep(order)
    }

    /// Cancel `order` and return the server's view of it afterwards.
    ///
    /// # Errors
    ///
    /// Returns why the order was not cancelled.
    pub async fn cancel(&self, order: &Order) -> Result<Order, OrderActionError> {
        if !order.can_cancel() {
            return Err(OrderActionError::NotCancellable(order.id));
        }

        let _guard = self
            .cancelling
            .try_acquire(order.id)
            .ok_or(OrderActionError::Busy)?;

        self.service.cancel_order(order.id).await.map_err(|error| {
            warn!(%error, order = %order.id, "cancellation failed");
            OrderActionError::Api(error)
        })?;

        let refreshed = self
            .service
            .order(order.id)
            .await
            .map_err(OrderActionError::Api)?;

        self.lifetime.keep(refreshed).ok_or(OrderActionError::Closed)
    }

    fn keep<T>(&self, value: T) -> Result<T, Notice> {
        self.lifetime
            .keep(value)
            .ok_or_else(|| Notice::Placeholder("The order view was closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use platter::orders::OrderStatus;
    use testresult::TestResult;

    use super::*;
    use crate::{services::MockOrdersService, test};

    #[tokio::test]
    async fn cancel_refetches_instead_of_editing_locally() -> TestResult {
        let mut service = MockOrdersService::new();
        service
            .expect_cancel_order()
            .once()
            .withf(|id| *id == OrderId::new(5))
            .return_once(|_| Ok(()));
        service
            .expect_order()
            .once()
            .return_once(|id| Ok(test::order(id.get(), "CANCELLED")));

        let view = OrdersView::new(Arc::new(service));
        let preparing = test::order(5, "PREPARING");

        let refreshed = view.cancel(&preparing).await?;

        assert_eq!(refreshed.status, OrderStatus::Cancelled);
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert!(!view.is_cancelling(OrderId::new(5)));

        Ok(())
    }

    #[tokio::test]
    async fn out_for_delivery_cannot_be_cancelled() -> TestResult {
        let mut service = MockOrdersService::new();
        service.expect_cancel_order().never();

        let view = OrdersView::new(Arc::new(service));
        let result = view.cancel(&test::order(5, "OUT_FOR_DELIVERY")).await;

        assert!(matches!(result, Err(OrderActionError::NotCancellable(_))));

        Ok(())
    }

    #[tokio::test]
    async fn cancel_failure_surfaces_server_message() -> TestResult {
        let mut service = MockOrdersService::new();
        service
            .expect_cancel_order()
            .once()
            .return_once(|_| Err(ApiError::rejected("Order is already being prepared")));
        service.expect_order().never();

        let view = OrdersView::new(Arc::new(service));
        let error = view
            .cancel(&test::order(5, "CONFIRMED"))
            .await
            .err()
            .ok_or("cancel should fail")?;

        assert_eq!(
            error.notice(),
            Some(Notice::Alert("Order is already being prepared".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn unauthorised_list_redirects_to_login() -> TestResult {
        let mut service = MockOrdersService::new();
        service
            .expect_orders()
            .once()
            .return_once(|| Err(ApiError::Unauthorized));

        let view = OrdersView::new(Arc::new(service));

        assert_eq!(
            view.list().await,
            Err(Notice::Redirect(platter::routes::Route::Login))
        );

        Ok(())
    }
}
