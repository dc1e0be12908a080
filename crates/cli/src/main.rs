//! Platter terminal client

use std::{process, sync::Arc};

use platter_app::{context::AppContext, session::FileSessionStore};
use tracing::debug;

use crate::{config::ClientConfig, observability::init_subscriber};

mod commands;
mod config;
mod gateway;
mod observability;
mod output;

/// Platter terminal client entry point
#[tokio::main]
pub async fn main() {
    let config = ClientConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        process::exit(1);
    }

    let session = FileSessionStore::new(&config.session.session_file);
    debug!(path = %session.path().display(), "using session file");

    let context = AppContext::new(&config.api.api_config(), Arc::new(session));

    if let Err(message) = config.command.run(&context).await {
        #[expect(clippy::print_stderr, reason = "command errors are reported on stderr")]
        {
            eprintln!("{message}");
        }

        process::exit(1);
    }
}
