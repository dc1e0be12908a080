//! API Config

use clap::Args;
use platter_app::context::{ApiConfig, DEFAULT_API_URL, DEFAULT_DELIVERY_API_URL};

/// Backend base URLs.
#[derive(Debug, Args)]
pub(crate) struct ApiArgs {
    /// Customer API base URL
    #[arg(long, env = "PLATTER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Delivery API base URL
    #[arg(long, env = "PLATTER_DELIVERY_API_URL", default_value = DEFAULT_DELIVERY_API_URL)]
    pub delivery_api_url: String,
}

impl ApiArgs {
    pub(crate) fn api_config(&self) -> ApiConfig {
        ApiConfig {
            api_url: self.api_url.clone(),
            delivery_api_url: self.delivery_api_url.clone(),
        }
    }
}
