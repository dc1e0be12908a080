use std::sync::Arc;

use clap::Args;
use platter::{checkout::CheckoutForm, orders::PaymentMethod};
use platter_app::{
    context::AppContext,
    views::{CheckoutFlowError, CheckoutOutcome},
};
use tracing::debug;

use crate::{
    gateway::TerminalGateway,
    output::{emit, or_dash},
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Delivery address
    #[arg(long)]
    address: String,

    /// Contact phone, 10 to 15 digits
    #[arg(long)]
    phone: String,

    /// `online` or `cod`
    #[arg(long, default_value = "online")]
    payment: PaymentMethod,

    /// Instructions for the restaurant or rider
    #[arg(long, default_value = "")]
    instructions: String,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            delivery_address: args.address,
            customer_phone: args.phone,
            payment_method: Some(args.payment),
            special_instructions: args.instructions,
        }
    }
}

pub(crate) async fn run(args: CheckoutArgs, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    let flow = context.checkout(Arc::new(TerminalGateway));
    let cart = flow.prepare().await.map_err(|notice| super::fail(&notice))?;

    emit(&format!(
        "Ordering {} item(s) from {} for {}",
        cart.item_count(),
        or_dash(cart.restaurant_name.as_deref()),
        cart.grand_total
    ));

    let form = CheckoutForm::from(args);

    match flow.submit(&form).await {
        Ok(CheckoutOutcome::Completed { order_id, notice }) => {
            if let Some(notice) = notice {
                emit(&super::fail(&notice));
            }

            emit(&format!(
                "Order {order_id} placed. Track it with `platter orders show {order_id}`."
            ));

            Ok(())
        }
        Ok(CheckoutOutcome::Abandoned) => {
            emit("Payment cancelled. Your cart is unchanged.");

            Ok(())
        }
        Err(error) => Err(failure(&error)),
    }
}

fn failure(error: &CheckoutFlowError) -> String {
    debug!(%error, "checkout failed");

    error
        .notice()
        .map_or_else(|| error.to_string(), |notice| super::fail(&notice))
}

#[cfg(test)]
mod tests {
    use platter::forms::FieldErrors;

    use super::*;

    #[test]
    fn arguments_fill_the_form() {
        let form = CheckoutForm::from(CheckoutArgs {
            address: "12 MG Road".to_string(),
            phone: "98765 43210".to_string(),
            payment: PaymentMethod::CashOnDelivery,
            instructions: String::new(),
        });

        assert_eq!(form.payment_method, Some(PaymentMethod::CashOnDelivery));
        assert_eq!(form.delivery_address, "12 MG Road");
    }

    #[test]
    fn invalid_form_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.push("deliveryAddress", "Delivery address is required");

        assert_eq!(
            failure(&CheckoutFlowError::Invalid(errors)),
            "deliveryAddress: Delivery address is required"
        );
    }
}
