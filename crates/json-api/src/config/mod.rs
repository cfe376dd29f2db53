//! Server configuration module

use clap::Parser;
use prd_tracker_app::{context::AppContext, errors::ConfigurationError};

use crate::config::{
    backend::BackendSettings,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ListenConfig,
    session::SessionConfig,
};

pub(crate) mod backend;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod session;

/// PRD tracker gateway configuration
#[derive(Debug, Parser)]
#[command(name = "prd-tracker-json", about = "PRD tracker JSON gateway", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ListenConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Spreadsheet backend settings.
    #[command(flatten)]
    pub backend: BackendSettings,

    /// Session token settings.
    #[command(flatten)]
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Validate the secrets and backend URL, then build the services.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing or blank secret, an invalid backend URL,
    /// or an HTTP client that cannot be built.
    pub fn app_context(&self) -> Result<AppContext, ConfigurationError> {
        AppContext::from_config(self.backend.to_backend_config()?, &self.session.secret()?)
    }
}
