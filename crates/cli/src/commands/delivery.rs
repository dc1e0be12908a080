use clap::{Args, Subcommand, ValueEnum};
use platter::{
    auth::PartnerRegistration,
    delivery::{DeliveryOrder, DeliveryOrderId, DeliveryStatus, FeedbackForm, PartnerProfile},
};
use platter_app::{
    context::AppContext,
    views::{DeliveryActionError, DeliveryBoard},
};

use crate::output::{self, emit, or_dash};

#[derive(Debug, Args)]
pub(crate) struct DeliveryCommand {
    #[command(subcommand)]
    command: DeliverySubcommand,
}

#[derive(Debug, Subcommand)]
enum DeliverySubcommand {
    /// Log in as a delivery partner
    Login {
        #[arg(long)]
        phone: String,

        #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign up as a delivery partner
    Register(RegisterArgs),

    /// Orders waiting for a partner
    Pending,

    /// Take a pending order
    Accept { id: DeliveryOrderId },

    /// Decline a pending order
    Reject { id: DeliveryOrderId },

    /// Move an accepted order to its next status
    Advance { id: DeliveryOrderId },

    /// One delivery order
    Show { id: DeliveryOrderId },

    /// Completed deliveries
    History,

    /// Show or change availability
    Availability {
        #[arg(value_enum)]
        set: Option<Toggle>,
    },

    /// Show or change the partner profile
    Profile(ProfileArgs),

    /// Leave feedback about a delivery
    Feedback(FeedbackArgs),
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    full_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value = "")]
    vehicle_number: String,
}

impl From<RegisterArgs> for PartnerRegistration {
    fn from(args: RegisterArgs) -> Self {
        Self {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            password: args.password,
            vehicle_number: args.vehicle_number,
        }
    }
}

#[derive(Debug, Args)]
struct FeedbackArgs {
    /// Delivery order id
    order: String,

    /// Stars from 1 to 5
    #[arg(long, default_value_t = 5)]
    rating: u8,

    #[arg(long, default_value = "")]
    comments: String,
}

impl From<FeedbackArgs> for FeedbackForm {
    fn from(args: FeedbackArgs) -> Self {
        Self {
            order_id: args.order,
            rating: args.rating,
            comments: args.comments,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

/// Profile fields to change. With none given the profile is shown.
#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long)]
    full_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    vehicle_number: Option<String>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.vehicle_number.is_none()
    }

    fn apply(self, profile: PartnerProfile) -> PartnerProfile {
        PartnerProfile {
            full_name: self.full_name.or(profile.full_name),
            email: self.email.or(profile.email),
            phone: self.phone.or(profile.phone),
            vehicle_number: self.vehicle_number.or(profile.vehicle_number),
            ..profile
        }
    }
}

pub(crate) async fn run(command: DeliveryCommand, context: &AppContext) -> Result<(), String> {
    let command = match command.command {
        DeliverySubcommand::Login { phone, password } => {
            return login(&phone, &password, context).await;
        }
        DeliverySubcommand::Register(args) => return register(args, context).await,
        command => command,
    };

    super::require_login(context)?;

    let board = context.delivery_board();

    match command {
        DeliverySubcommand::Login { .. } | DeliverySubcommand::Register(_) => {}
        DeliverySubcommand::Pending => {
            let orders = board.refresh().await.map_err(|notice| super::fail(&notice))?;
            emit(&order_table(&orders, "No pending orders right now."));
        }
        DeliverySubcommand::Accept { id } => {
            let confirmation = board.accept(id).await.map_err(|error| failure(&error))?;
            emit(&confirmation);
            emit(&order_table(&board.pending(), "No other pending orders."));
        }
        DeliverySubcommand::Reject { id } => {
            let confirmation = board.reject(id).await.map_err(|error| failure(&error))?;
            emit(&confirmation);
            emit(&order_table(&board.pending(), "No other pending orders."));
        }
        DeliverySubcommand::Advance { id } => advance(&board, id).await?,
        DeliverySubcommand::Show { id } => {
            let order = board.order(id).await.map_err(|notice| super::fail(&notice))?;
            emit(&detail(&order));
        }
        DeliverySubcommand::History => {
            let orders = board.history().await.map_err(|notice| super::fail(&notice))?;
            emit(&order_table(&orders, "No deliveries yet."));
        }
        DeliverySubcommand::Availability { set } => {
            let available = match set {
                Some(toggle) => board
                    .set_availability(matches!(toggle, Toggle::On))
                    .await
                    .map_err(|error| failure(&error))?,
                None => board
                    .availability()
                    .await
                    .map_err(|notice| super::fail(&notice))?,
            };

            emit(if available {
                "You are available for orders."
            } else {
                "You are offline."
            });
        }
        DeliverySubcommand::Profile(args) => {
            let mut profile = board.profile().await.map_err(|notice| super::fail(&notice))?;

            if !args.is_empty() {
                profile = board
                    .update_profile(args.apply(profile))
                    .await
                    .map_err(|error| failure(&error))?;
                emit("Profile updated.");
            }

            emit(&profile_text(&profile));
        }
        DeliverySubcommand::Feedback(args) => {
            let confirmation = board
                .submit_feedback(&args.into())
                .await
                .map_err(|error| failure(&error))?;
            emit(confirmation);
        }
    }

    Ok(())
}

async fn login(phone: &str, password: &str, context: &AppContext) -> Result<(), String> {
    context
        .auth_flow()
        .partner_login(phone, password)
        .await
        .map_err(|error| super::fail(&error.notice()))?;

    emit("Logged in. See waiting orders with `platter delivery pending`.");

    Ok(())
}

async fn register(args: RegisterArgs, context: &AppContext) -> Result<(), String> {
    let route = context
        .auth_flow()
        .partner_register(&args.into())
        .await
        .map_err(|error| super::fail(&error.notice()))?;

    emit(&format!("Registered. Log in with `platter delivery login` ({route})."));

    Ok(())
}

async fn advance(board: &DeliveryBoard, id: DeliveryOrderId) -> Result<(), String> {
    let order = board.order(id).await.map_err(|notice| super::fail(&notice))?;
    let label = order.status().action_label().unwrap_or("Update status");
    let next = board.advance(&order).await.map_err(|error| failure(&error))?;

    emit(&format!("{label}: order {} is now {}", order.id, status_badge(&next)));

    Ok(())
}

fn failure(error: &DeliveryActionError) -> String {
    error
        .notice()
        .map_or_else(|| error.to_string(), |notice| super::fail(&notice))
}

fn status_badge(status: &DeliveryStatus) -> String {
    output::paint(status.tone(), status.as_str())
}

fn order_table(orders: &[DeliveryOrder], empty: &str) -> String {
    if orders.is_empty() {
        return empty.to_string();
    }

    output::table(
        &["Id", "Restaurant", "Customer", "Address", "Items", "Status"],
        orders.iter().map(|order| {
            vec![
                order.id.to_string(),
                or_dash(order.restaurant_name.as_deref()),
                or_dash(order.customer_name.as_deref()),
                or_dash(order.address.as_deref()),
                order.items.join(", "),
                status_badge(&order.status()),
            ]
        }),
        &[],
    )
}

fn detail(order: &DeliveryOrder) -> String {
    let mut lines = vec![
        format!("Order {} · {}", order.id, status_badge(&order.status())),
        format!("Pick up from {}", or_dash(order.restaurant_name.as_deref())),
        format!(
            "Deliver to {} at {} ({})",
            or_dash(order.customer_name.as_deref()),
            or_dash(order.address.as_deref()),
            or_dash(order.customer_phone.as_deref())
        ),
        format!("Items: {}", order.items.join(", ")),
    ];

    if let Some(label) = order.status().action_label() {
        lines.push(format!("{label}: `platter delivery advance {}`", order.id));
    }

    lines.join("\n")
}

fn profile_text(profile: &PartnerProfile) -> String {
    [
        format!("Name     {}", or_dash(profile.full_name.as_deref())),
        format!("Email    {}", or_dash(profile.email.as_deref())),
        format!("Phone    {}", or_dash(profile.phone.as_deref())),
        format!("Vehicle  {}", or_dash(profile.vehicle_number.as_deref())),
        format!(
            "Status   {}",
            if profile.is_available { "available" } else { "offline" }
        ),
    ]
    .join("\n")
}
