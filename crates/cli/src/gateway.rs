//! Payment overlay for the terminal.
//!
//! Shows what is being charged and reads the payment reference the
//! customer got from the payment provider. A blank line dismisses the
//! overlay.

use async_trait::async_trait;
use platter::money::Amount;
use platter_app::views::{GatewayError, PaymentGateway, PaymentOutcome, PaymentRequest};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::emit;

#[derive(Debug, Default)]
pub(crate) struct TerminalGateway;

#[async_trait]
impl PaymentGateway for TerminalGateway {
    async fn collect(&self, request: PaymentRequest) -> Result<PaymentOutcome, GatewayError> {
        emit(&format!(
            "{}\nAmount: {} ({})\nEnter the payment id to confirm, or leave blank to cancel:",
            request.description,
            Amount::from_minor(request.amount_minor),
            request.currency,
        ));

        let mut line = String::new();

        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|error| GatewayError {
                reason: error.to_string(),
            })?;

        Ok(outcome(&line))
    }
}

fn outcome(line: &str) -> PaymentOutcome {
    match line.trim() {
        "" => PaymentOutcome::Dismissed,
        payment_id => PaymentOutcome::Completed {
            payment_id: payment_id.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_dismisses() {
        assert_eq!(outcome("  \n"), PaymentOutcome::Dismissed);
        assert_eq!(
            outcome("pay_Nx81\n"),
            PaymentOutcome::Completed {
                payment_id: "pay_Nx81".to_string()
            }
        );
    }
}
