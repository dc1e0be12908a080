use clap::{Args, Subcommand};
use platter::auth::AdminRegistration;
use platter_app::context::AppContext;

use super::auth::AccountRole;
use crate::output::emit;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Create an account for someone else
    Register(AdminRegisterArgs),
}

#[derive(Debug, Args)]
struct AdminRegisterArgs {
    /// Username of the new account
    #[arg(long)]
    username: String,

    /// Password of the new account
    #[arg(long, env = "PLATTER_NEW_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, value_enum, default_value_t = AccountRole::Owner)]
    role: AccountRole,

    #[arg(long)]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,
}

impl From<AdminRegisterArgs> for AdminRegistration {
    fn from(args: AdminRegisterArgs) -> Self {
        Self {
            username: args.username,
            password: args.password,
            role: args.role.into(),
            first_name: args.first_name,
            last_name: args.last_name,
        }
    }
}

pub(crate) async fn run(command: AdminCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    match command.command {
        AdminSubcommand::Register(args) => {
            let username = args.username.clone();

            context
                .auth_flow()
                .admin_register(args.into())
                .await
                .map_err(|error| format!("Registration Fail: {}", super::fail(&error.notice())))?;

            emit(&format!("Registration Success: {username} can now log in."));
        }
    }

    Ok(())
}
