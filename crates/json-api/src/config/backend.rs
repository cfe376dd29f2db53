//! Backend Config

use std::time::Duration;

use clap::Args;
use prd_tracker_app::{backend::BackendConfig, errors::ConfigurationError};

/// Spreadsheet backend settings.
#[derive(Debug, Args)]
pub struct BackendSettings {
    /// Absolute http(s) URL of the spreadsheet service
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Shared secret injected into every backend call
    #[arg(long, env = "BACKEND_SECRET", hide_env_values = true)]
    pub backend_secret: Option<String>,

    /// Per-call backend timeout in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECONDS", default_value_t = 30)]
    pub backend_timeout_seconds: u64,
}

impl BackendSettings {
    /// Validate the raw settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL or secret is missing or invalid.
    pub fn to_backend_config(&self) -> Result<BackendConfig, ConfigurationError> {
        let url = self
            .backend_url
            .as_deref()
            .ok_or(ConfigurationError::Missing { name: "BACKEND_URL" })?;

        let secret = self
            .backend_secret
            .as_deref()
            .ok_or(ConfigurationError::Missing {
                name: "BACKEND_SECRET",
            })?;

        BackendConfig::new(
            url,
            secret,
            Duration::from_secs(self.backend_timeout_seconds),
        )
    }
}
