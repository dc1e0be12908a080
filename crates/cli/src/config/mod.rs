//! Client configuration module

use clap::Parser;

use crate::{
    commands::Commands,
    config::{api::ApiArgs, observability::LoggingConfig, session::SessionConfig},
};

pub(crate) mod api;
pub(crate) mod observability;
pub(crate) mod session;

/// Platter terminal client
#[derive(Debug, Parser)]
#[command(name = "platter", about = "Order food from the terminal", long_about = None)]
pub(crate) struct ClientConfig {
    /// Backend locations.
    #[command(flatten)]
    pub api: ApiArgs,

    /// Where the login is kept between runs.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl ClientConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::config::observability::LogFormat;

    #[test]
    fn defaults_target_local_backends() -> TestResult {
        let config = ClientConfig::try_parse_from(["platter", "cart", "show"])?;

        assert_eq!(config.api.api_config().api_url, "http://localhost:9090");
        assert_eq!(
            config.api.api_config().delivery_api_url,
            "http://localhost:9099"
        );
        assert!(matches!(config.logging.log_format, LogFormat::Compact));

        Ok(())
    }

    #[test]
    fn global_flags_override_defaults() -> TestResult {
        let config = ClientConfig::try_parse_from([
            "platter",
            "--api-url",
            "https://food.example.com/",
            "--log-format",
            "json",
            "orders",
            "list",
        ])?;

        assert_eq!(config.api.api_url, "https://food.example.com/");
        assert!(matches!(config.logging.log_format, LogFormat::Json));

        Ok(())
    }
}
