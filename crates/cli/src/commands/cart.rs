use std::num::NonZeroU32;

use clap::{Args, Subcommand};
use platter::{
    cart::{Cart, CartItemId, CartScreen},
    restaurants::MenuItemId,
};
use platter_app::{context::AppContext, views::CartActionError};

use crate::output::{self, emit, or_dash};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and order summary
    Show,

    /// Add a menu item
    Add {
        /// Menu item id
        item: MenuItemId,

        #[arg(long, default_value = "1")]
        quantity: NonZeroU32,

        /// Instructions for the kitchen
        #[arg(long)]
        instructions: Option<String>,
    },

    /// One more of a cart line
    Inc { line: CartItemId },

    /// One fewer of a cart line
    Dec { line: CartItemId },

    /// Set the quantity of a cart line
    Set { line: CartItemId, quantity: NonZeroU32 },

    /// Remove a cart line
    Remove { line: CartItemId },

    /// Remove everything
    Clear,
}

pub(crate) async fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    let view = context.cart_view();

    let result = match command.command {
        CartSubcommand::Show => {
            view.load().await.map_err(|notice| super::fail(&notice))?;
            emit(&render(&view.screen(), view.cart().as_ref()));

            return Ok(());
        }
        CartSubcommand::Add {
            item,
            quantity,
            instructions,
        } => view.add(item, quantity, instructions).await,
        CartSubcommand::Inc { line } => {
            view.load().await.map_err(|notice| super::fail(&notice))?;
            view.increment(line).await
        }
        CartSubcommand::Dec { line } => {
            view.load().await.map_err(|notice| super::fail(&notice))?;
            view.decrement(line).await
        }
        CartSubcommand::Set { line, quantity } => view.set_quantity(line, quantity).await,
        CartSubcommand::Remove { line } => view.remove(line).await,
        CartSubcommand::Clear => view.clear().await,
    };

    let cart = result.map_err(|error| action_failure(&error))?;

    emit(&render(&view.screen(), Some(&cart)));

    Ok(())
}

fn action_failure(error: &CartActionError) -> String {
    match (error, error.notice()) {
        (CartActionError::BelowOne, _) => {
            "Quantity is already 1. Use `platter cart remove` to drop the line.".to_string()
        }
        (CartActionError::UnknownItem, _) => "That line is not in the cart.".to_string(),
        (_, Some(notice)) => super::fail(&notice),
        (_, None) => error.to_string(),
    }
}

fn render(screen: &CartScreen, cart: Option<&Cart>) -> String {
    match (screen, cart) {
        (CartScreen::Empty { .. }, _) => {
            "Your cart is empty. Browse with `platter restaurants search`.".to_string()
        }
        (CartScreen::Summary { gate }, Some(cart)) => {
            let gate = *gate;
            let mut lines = vec![
                format!("From {}", or_dash(cart.restaurant_name.as_deref())),
                line_table(cart),
                format!("Subtotal      {}", cart.subtotal),
                format!("Delivery fee  {}", cart.delivery_fee),
                format!("Tax           {}", cart.tax_amount),
                format!("Total         {}", cart.grand_total),
            ];

            match gate.message() {
                Some(message) => lines.push(message),
                None => lines.push("Ready to order: `platter checkout`".to_string()),
            }

            lines.join("\n")
        }
        _ => "The cart is unavailable.".to_string(),
    }
}

fn line_table(cart: &Cart) -> String {
    output::table(
        &["Line", "Item", "Qty", "Price", "Total", "Notes"],
        cart.items.iter().map(|line| {
            vec![
                line.id.to_string(),
                or_dash(line.menu_item_name.as_deref()),
                line.quantity.to_string(),
                line.price.to_string(),
                line.total_price.to_string(),
                or_dash(line.special_instructions.as_deref()),
            ]
        }),
        &[2, 3, 4],
    )
}
