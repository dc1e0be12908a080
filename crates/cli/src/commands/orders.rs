use clap::{Args, Subcommand};
use jiff::civil::DateTime;
use platter::orders::{Order, OrderId, OrderStatus};
use platter_app::{context::AppContext, views::OrderActionError};

use crate::output::{self, badge, emit, or_dash};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Every order, newest first
    List,

    /// Orders still on their way
    Active,

    /// One order with its items and status timeline
    Show { id: OrderId },

    /// Cancel an order that the restaurant has not started
    Cancel {
        id: OrderId,

        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub(crate) async fn run(command: OrdersCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    let view = context.orders_view();

    match command.command {
        OrdersSubcommand::List => {
            let orders = view.list().await.map_err(|notice| super::fail(&notice))?;
            emit(&summary_table(&orders, "You have no orders yet."));
        }
        OrdersSubcommand::Active => {
            let orders = view.active().await.map_err(|notice| super::fail(&notice))?;
            emit(&summary_table(&orders, "No active orders."));
        }
        OrdersSubcommand::Show { id } => {
            let order = view.detail(id).await.map_err(|notice| super::fail(&notice))?;
            emit(&detail(&order));
        }
        OrdersSubcommand::Cancel { id, yes } => {
            let order = view.detail(id).await.map_err(|notice| super::fail(&notice))?;

            if !yes {
                return Err(format!(
                    "Cancel order {}? Run again with --yes to confirm.",
                    order.order_number
                ));
            }

            let order = view
                .cancel(&order)
                .await
                .map_err(|error| cancel_failure(&error))?;

            emit(&format!(
                "Order {} is now {}",
                order.order_number,
                badge(&order.presentation())
            ));
        }
    }

    Ok(())
}

fn cancel_failure(error: &OrderActionError) -> String {
    match error.notice() {
        Some(notice) => super::fail(&notice),
        None if matches!(error, OrderActionError::NotCancellable(_)) => {
            "This order can no longer be cancelled.".to_string()
        }
        None => error.to_string(),
    }
}

fn when(value: Option<DateTime>) -> String {
    value.map_or_else(
        || "-".to_string(),
        |value| value.strftime("%d %b %Y %H:%M").to_string(),
    )
}

fn summary_table(orders: &[Order], empty: &str) -> String {
    if orders.is_empty() {
        return empty.to_string();
    }

    output::table(
        &["Id", "Order", "Restaurant", "Placed", "Items", "Total", "Status"],
        orders.iter().map(|order| {
            vec![
                order.id.to_string(),
                order.order_number.clone(),
                or_dash(order.restaurant_name.as_deref()),
                when(order.created_at),
                order.item_count().to_string(),
                order.total_amount.to_string(),
                badge(&order.presentation()),
            ]
        }),
        &[4, 5],
    )
}

fn detail(order: &Order) -> String {
    let mut sections = vec![
        format!(
            "Order {} · {} · {}",
            order.order_number,
            or_dash(order.restaurant_name.as_deref()),
            badge(&order.presentation())
        ),
        output::table(
            &["Item", "Qty", "Price", "Total"],
            order.order_items.iter().map(|item| {
                vec![
                    or_dash(item.item_name.as_deref()),
                    item.quantity.to_string(),
                    item.price.to_string(),
                    item.total_price.to_string(),
                ]
            }),
            &[1, 2, 3],
        ),
        format!(
            "Subtotal {} · Delivery {} · Tax {} · Total {}",
            order.subtotal, order.delivery_fee, order.tax_amount, order.total_amount
        ),
        format!(
            "Deliver to {} · {}",
            or_dash(order.delivery_address.as_deref()),
            or_dash(order.customer_phone.as_deref())
        ),
    ];

    if let Some(method) = order.payment_method {
        let status = order
            .payment_status
            .as_ref()
            .map(|status| output::paint(status.tone(), &status.label()))
            .unwrap_or_default();

        sections.push(format!("Payment: {} {status}", method.label()));
    }

    if let Some(partner) = &order.delivery_partner_name {
        sections.push(format!(
            "Rider: {partner} {}",
            or_dash(order.delivery_partner_phone.as_deref())
        ));
    }

    sections.push(timeline(order));

    if order.can_cancel() {
        sections.push(format!("Cancel with `platter orders cancel {} --yes`", order.id));
    }

    if order.can_review() {
        sections.push(format!("Review with `platter reviews submit {}`", order.id));
    }

    sections.join("\n")
}

/// The lifecycle with reached steps marked. Cancelled orders list the
/// updates the server recorded instead.
fn timeline(order: &Order) -> String {
    if order.status == OrderStatus::Cancelled || !order.delivery_status_updates.is_empty() {
        return order
            .delivery_status_updates
            .iter()
            .map(|update| {
                format!(
                    "  {} {} {}",
                    when(update.created_at),
                    badge(&update.status.presentation()),
                    or_dash(update.description.as_deref())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    let steps: Vec<OrderStatus> = OrderStatus::lifecycle()
        .into_iter()
        .filter(|status| *status != OrderStatus::Cancelled)
        .collect();
    let reached = steps
        .iter()
        .position(|status| *status == order.status)
        .unwrap_or_default();

    steps
        .iter()
        .enumerate()
        .map(|(index, status)| {
            let mark = if index <= reached { "●" } else { "○" };
            format!("  {mark} {}", status.presentation().label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_a_message() {
        assert_eq!(summary_table(&[], "No active orders."), "No active orders.");
    }

    #[test]
    fn not_cancellable_is_explained() {
        assert_eq!(
            cancel_failure(&OrderActionError::NotCancellable(OrderId::new(3))),
            "This order can no longer be cancelled."
        );
    }
}
