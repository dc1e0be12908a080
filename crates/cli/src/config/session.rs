//! Session Config

use std::path::PathBuf;

use clap::Args;

/// Session storage settings.
#[derive(Debug, Args)]
pub(crate) struct SessionConfig {
    /// File the login token is stored in
    #[arg(long, env = "PLATTER_SESSION_FILE", default_value = ".platter/session.json")]
    pub session_file: PathBuf,
}
