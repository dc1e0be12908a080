//! Subcommands, one module per area.

use clap::Subcommand;
use platter_app::{
    context::AppContext,
    errors::Notice,
    session::{Session, require_session},
};

use crate::output;

mod admin;
mod auth;
mod cart;
mod checkout;
mod delivery;
mod orders;
mod owner;
mod restaurants;
mod reviews;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Log in with username and password
    Login(auth::LoginArgs),

    /// Create an account
    Register(auth::RegisterArgs),

    /// Forget the stored login
    Logout,

    /// Browse and search restaurants
    Restaurants(restaurants::RestaurantsCommand),

    /// Show and search a restaurant's menu
    Menu(restaurants::MenuArgs),

    /// View and change the cart
    Cart(cart::CartCommand),

    /// Place an order from the cart
    Checkout(checkout::CheckoutArgs),

    /// Order history, tracking and cancellation
    Orders(orders::OrdersCommand),

    /// Write and read reviews
    Reviews(reviews::ReviewsCommand),

    /// Delivery partner dashboard
    Delivery(delivery::DeliveryCommand),

    /// Restaurant owner dashboard
    Owner(owner::OwnerCommand),

    /// Administrator tools
    Admin(admin::AdminCommand),
}

impl Commands {
    pub(crate) async fn run(self, context: &AppContext) -> Result<(), String> {
        match self {
            Self::Login(args) => auth::login(args, context).await,
            Self::Register(args) => auth::register(args, context).await,
            Self::Logout => auth::logout(context),
            Self::Restaurants(command) => restaurants::run(command, context).await,
            Self::Menu(args) => restaurants::menu(&args, context).await,
            Self::Cart(command) => cart::run(command, context).await,
            Self::Checkout(args) => checkout::run(args, context).await,
            Self::Orders(command) => orders::run(command, context).await,
            Self::Reviews(command) => reviews::run(command, context).await,
            Self::Delivery(command) => delivery::run(command, context).await,
            Self::Owner(command) => owner::run(command, context).await,
            Self::Admin(command) => admin::run(command, context).await,
        }
    }
}

/// Protected commands need a stored login.
fn require_login(context: &AppContext) -> Result<Session, String> {
    require_session(context.session.as_ref())
        .map_err(|route| output::notice(&Notice::Redirect(route)))
}

/// Error text for a notice.
fn fail(notice: &Notice) -> String {
    output::notice(notice)
}
