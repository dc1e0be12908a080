use clap::{Args, ValueEnum};
use platter::{auth::Role, routes::Route};
use platter_app::{context::AppContext, errors::Notice};

use crate::output::emit;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account username
    #[arg(long)]
    username: String,

    /// Account password
    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(super) enum AccountRole {
    Customer,
    Owner,
    Delivery,
    Admin,
}

impl From<AccountRole> for Role {
    fn from(value: AccountRole) -> Self {
        match value {
            AccountRole::Customer => Self::Customer,
            AccountRole::Owner => Self::RestaurantOwner,
            AccountRole::Delivery => Self::DeliveryPartner,
            AccountRole::Admin => Self::Admin,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Account username
    #[arg(long)]
    username: String,

    /// Account password
    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Account type
    #[arg(long, value_enum, default_value_t = AccountRole::Customer)]
    role: AccountRole,
}

pub(crate) async fn login(args: LoginArgs, context: &AppContext) -> Result<(), String> {
    let route = context
        .auth_flow()
        .login(&args.username, &args.password)
        .await
        .map_err(|error| match error.notice() {
            Notice::Redirect(Route::Error) => {
                "Login failed. Check your username and password.".to_string()
            }
            notice => super::fail(&notice),
        })?;

    let name = context
        .session
        .load()
        .ok()
        .flatten()
        .map(|session| session.display_name().to_string())
        .unwrap_or_default();

    emit(&format!("Welcome, {name}. Start at {route}"));

    Ok(())
}

pub(crate) async fn register(args: RegisterArgs, context: &AppContext) -> Result<(), String> {
    context
        .auth_flow()
        .register(&args.name, &args.username, &args.password, args.role.into())
        .await
        .map_err(|error| format!("Registration failed: {}", super::fail(&error.notice())))?;

    emit("Registration successful. Log in with `platter login`.");

    Ok(())
}

pub(crate) fn logout(context: &AppContext) -> Result<(), String> {
    context
        .auth_flow()
        .logout()
        .map_err(|error| super::fail(&error.notice()))?;

    emit("Logged out.");

    Ok(())
}
