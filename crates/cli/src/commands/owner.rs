use clap::{Args, Subcommand};
use platter::{
    orders::OrderId,
    owner::{MenuItemForm, OwnedRestaurant, OwnerDecision, OwnerOrder, RestaurantForm},
    restaurants::{MenuItem, MenuItemId},
};
use platter_app::{
    context::AppContext,
    views::{OwnerDashboard, OwnerError},
};

use crate::output::{emit, or_dash, paint, table};

#[derive(Debug, Args)]
pub(crate) struct OwnerCommand {
    #[command(subcommand)]
    command: OwnerSubcommand,
}

#[derive(Debug, Subcommand)]
enum OwnerSubcommand {
    /// Show the restaurant
    Restaurant,

    /// Create the restaurant, or change its details
    Save(RestaurantArgs),

    /// Remove the restaurant
    Close {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// List every menu item
    Menu,

    /// Add a menu item
    AddItem(MenuItemArgs),

    /// Change a menu item
    EditItem {
        id: MenuItemId,

        #[command(flatten)]
        changes: MenuItemArgs,
    },

    /// Remove a menu item
    RemoveItem { id: MenuItemId },

    /// Orders placed at the restaurant
    Orders,

    /// Accept a pending order
    Accept { id: OrderId },

    /// Reject a pending order
    Reject { id: OrderId },
}

/// Restaurant fields. Omitted fields keep their stored value.
#[derive(Debug, Default, Args)]
struct RestaurantArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    contact: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Opening time, e.g. 09:30
    #[arg(long)]
    opens: Option<String>,

    /// Closing time, e.g. 22:00
    #[arg(long)]
    closes: Option<String>,
}

impl RestaurantArgs {
    fn apply(self, form: RestaurantForm) -> RestaurantForm {
        RestaurantForm {
            name: self.name.unwrap_or(form.name),
            location: self.location.unwrap_or(form.location),
            contact: self.contact.unwrap_or(form.contact),
            description: self.description.unwrap_or(form.description),
            opening_time: self.opens.unwrap_or(form.opening_time),
            closing_time: self.closes.unwrap_or(form.closing_time),
        }
    }
}

/// Menu item fields. Omitted fields keep their stored value.
#[derive(Debug, Default, Args)]
struct MenuItemArgs {
    #[arg(long)]
    name: Option<String>,

    /// Price in rupees
    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    image_url: Option<String>,

    /// Mark the item sold out
    #[arg(long, conflicts_with = "available")]
    unavailable: bool,

    /// Mark the item orderable again
    #[arg(long)]
    available: bool,
}

impl MenuItemArgs {
    fn apply(self, form: MenuItemForm) -> MenuItemForm {
        let is_available = if self.unavailable {
            false
        } else {
            self.available || form.is_available
        };

        MenuItemForm {
            name: self.name.unwrap_or(form.name),
            price: self.price.unwrap_or(form.price),
            description: self.description.unwrap_or(form.description),
            category: self.category.unwrap_or(form.category),
            image_url: self.image_url.unwrap_or(form.image_url),
            is_available,
        }
    }
}

pub(crate) async fn run(command: OwnerCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    let dashboard = context.owner_dashboard();
    let restaurant = dashboard.load().await.map_err(|notice| super::fail(&notice))?;

    match command.command {
        OwnerSubcommand::Restaurant => match restaurant {
            Some(restaurant) => emit(&restaurant_text(&restaurant)),
            None => emit("No restaurant yet. Add one with `platter owner save`."),
        },
        OwnerSubcommand::Save(args) => {
            let form = args.apply(
                restaurant
                    .as_ref()
                    .map(OwnedRestaurant::to_form)
                    .unwrap_or_default(),
            );
            let confirmation = dashboard
                .save_restaurant(&form)
                .await
                .map_err(|error| failure(&error))?;

            emit(confirmation);

            if let Some(saved) = dashboard.restaurant() {
                emit(&restaurant_text(&saved));
            }
        }
        OwnerSubcommand::Close { yes } => {
            let name = restaurant
                .as_ref()
                .map(|restaurant| restaurant.display_name().to_string())
                .unwrap_or_default();

            if !yes {
                return Err(format!("Remove {name}? Run again with --yes to confirm."));
            }

            dashboard
                .delete_restaurant()
                .await
                .map_err(|error| failure(&error))?;
            emit(&format!("{name} removed."));
        }
        OwnerSubcommand::Menu => {
            let items = dashboard
                .refresh_menu()
                .await
                .map_err(|notice| super::fail(&notice))?;
            emit(&menu_table(&items));
        }
        OwnerSubcommand::AddItem(args) => {
            dashboard
                .add_menu_item(&args.apply(MenuItemForm::default()))
                .await
                .map_err(|error| failure(&error))?;
            emit("Menu item saved.");
            emit(&menu_table(&dashboard.menu()));
        }
        OwnerSubcommand::EditItem { id, changes } => {
            edit_item(&dashboard, id, changes).await?;
        }
        OwnerSubcommand::RemoveItem { id } => {
            let confirmation = dashboard
                .delete_menu_item(id)
                .await
                .map_err(|error| failure(&error))?;
            emit(confirmation);
        }
        OwnerSubcommand::Orders => {
            let orders = dashboard
                .refresh_orders()
                .await
                .map_err(|notice| super::fail(&notice))?;
            emit(&order_table(&orders));
        }
        OwnerSubcommand::Accept { id } => decide(&dashboard, id, OwnerDecision::Accepted).await?,
        OwnerSubcommand::Reject { id } => decide(&dashboard, id, OwnerDecision::Rejected).await?,
    }

    Ok(())
}

async fn edit_item(
    dashboard: &OwnerDashboard,
    id: MenuItemId,
    changes: MenuItemArgs,
) -> Result<(), String> {
    let items = dashboard
        .refresh_menu()
        .await
        .map_err(|notice| super::fail(&notice))?;

    let item = items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| format!("Menu item {id} is not on your menu."))?;

    dashboard
        .update_menu_item(id, &changes.apply(MenuItemForm::from(item)))
        .await
        .map_err(|error| failure(&error))?;

    emit("Menu item saved.");
    emit(&menu_table(&dashboard.menu()));

    Ok(())
}

async fn decide(
    dashboard: &OwnerDashboard,
    id: OrderId,
    decision: OwnerDecision,
) -> Result<(), String> {
    dashboard
        .refresh_orders()
        .await
        .map_err(|notice| super::fail(&notice))?;

    let status = dashboard
        .decide(id, decision)
        .await
        .map_err(|error| failure(&error))?;

    emit(&format!("Order {id} is now {}", status.presentation().label));

    Ok(())
}

fn failure(error: &OwnerError) -> String {
    error
        .notice()
        .map_or_else(|| error.to_string(), |notice| super::fail(&notice))
}

fn restaurant_text(restaurant: &OwnedRestaurant) -> String {
    let hours = match (restaurant.opening_time, restaurant.closing_time) {
        (Some(opens), Some(closes)) => {
            format!("{} - {}", opens.strftime("%H:%M"), closes.strftime("%H:%M"))
        }
        _ => "-".to_string(),
    };

    [
        format!("{} (#{})", restaurant.display_name(), restaurant.id),
        format!("Location     {}", or_dash(restaurant.location.as_deref())),
        format!("Contact      {}", or_dash(restaurant.contact.as_deref())),
        format!("Hours        {hours}"),
        format!("Description  {}", or_dash(restaurant.description.as_deref())),
    ]
    .join("\n")
}

fn menu_table(items: &[MenuItem]) -> String {
    if items.is_empty() {
        return "No menu items yet. Add one with `platter owner add-item`.".to_string();
    }

    table(
        &["Id", "Name", "Category", "Price", "Available"],
        items.iter().map(|item| {
            vec![
                item.id.to_string(),
                or_dash(item.name.as_deref()),
                or_dash(item.category.as_deref()),
                item.price.to_string(),
                if item.is_orderable() { "yes" } else { "no" }.to_string(),
            ]
        }),
        &[3],
    )
}

fn order_table(orders: &[OwnerOrder]) -> String {
    if orders.is_empty() {
        return "No orders found.".to_string();
    }

    table(
        &["Id", "Customer", "Items", "Total", "Status"],
        orders.iter().map(|order| {
            let presentation = order.status.presentation();
            let mut status = paint(presentation.tone, &presentation.label);

            if order.awaits_decision() {
                status.push_str(&format!(" (accept/reject {})", order.id));
            }

            vec![
                order.id.to_string(),
                or_dash(order.customer_name.as_deref()),
                order.item_names(),
                order.total_amount.to_string(),
                status,
            ]
        }),
        &[3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restaurant_flags_keep_stored_values() {
        let stored = RestaurantForm {
            name: "Spice Route".to_string(),
            location: "MG Road".to_string(),
            contact: "080-1234".to_string(),
            ..RestaurantForm::default()
        };

        let form = RestaurantArgs {
            contact: Some("080-9999".to_string()),
            opens: Some("09:00".to_string()),
            ..RestaurantArgs::default()
        }
        .apply(stored);

        assert_eq!(form.name, "Spice Route");
        assert_eq!(form.contact, "080-9999");
        assert_eq!(form.opening_time, "09:00");
    }

    #[test]
    fn availability_flags_override_the_stored_flag() {
        let stored = MenuItemForm {
            is_available: false,
            ..MenuItemForm::default()
        };

        let unchanged = MenuItemArgs::default().apply(stored.clone());
        let restocked = MenuItemArgs {
            available: true,
            ..MenuItemArgs::default()
        }
        .apply(stored);
        let sold_out = MenuItemArgs {
            unavailable: true,
            ..MenuItemArgs::default()
        }
        .apply(MenuItemForm::default());

        assert!(!unchanged.is_available);
        assert!(restocked.is_available);
        assert!(!sold_out.is_available);
    }

    #[test]
    fn empty_lists_explain_themselves() {
        assert_eq!(order_table(&[]), "No orders found.");
        assert!(menu_table(&[]).contains("platter owner add-item"));
    }
}
