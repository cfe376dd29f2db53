//! Error taxonomy shared by the gateway and the operator client.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalised classification for every failure that crosses a boundary.
///
/// The gateway renders the kind alongside the message in error bodies, and
/// the operator client uses it to decide whether the session must be torn
/// down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Auth,
    Unauthenticated,
    InvalidSession,
    Forbidden,
    Validation,
    BackendProtocol,
    BackendRejected,
    Transport,
    Timeout,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Auth => "auth",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidSession => "invalid_session",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation",
            Self::BackendProtocol => "backend_protocol",
            Self::BackendRejected => "backend_rejected",
            Self::Transport => "transport",
            Self::Timeout => "timeout",
        }
    }

    /// HTTP status used when this kind is rendered by the gateway.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Auth | Self::Unauthenticated | Self::InvalidSession => 401,
            Self::Forbidden => 403,
            Self::Validation => 400,
            Self::BackendRejected => 422,
            Self::BackendProtocol | Self::Transport => 502,
            Self::Timeout => 504,
            Self::Configuration => 500,
        }
    }

    /// Best-effort kind for an error response that carried no `kind` field.
    #[must_use]
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            422 => Self::BackendRejected,
            504 => Self::Timeout,
            500 => Self::Configuration,
            _ => Self::BackendProtocol,
        }
    }

    /// Whether the client must discard its session when it sees this kind.
    #[must_use]
    pub const fn ends_session(self) -> bool {
        matches!(self, Self::Unauthenticated | Self::InvalidSession)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Startup configuration problems. These abort the process before it serves.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{name} is missing or blank")]
    Missing { name: &'static str },

    #[error("{name} is not a usable URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigurationError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
