//! Session Config

use clap::Args;
use prd_tracker_app::{errors::ConfigurationError, secret::Secret};

/// Session token settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Secret used to sign and verify session tokens
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,
}

impl SessionConfig {
    /// The signing secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Missing`] when unset or blank.
    pub fn secret(&self) -> Result<Secret, ConfigurationError> {
        let raw = self
            .session_secret
            .clone()
            .ok_or(ConfigurationError::Missing {
                name: "SESSION_SECRET",
            })?;

        Secret::new("SESSION_SECRET", raw)
    }
}
