//! Backend channel errors.

use thiserror::Error;

use crate::errors::ErrorKind;

/// Maximum number of characters of a raw body kept for diagnostics.
pub const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("backend request failed")]
    Transport(#[source] reqwest::Error),

    #[error("backend returned an unexpected response ({status}): {reason}")]
    Protocol {
        status: u16,
        excerpt: String,
        reason: String,
    },

    #[error("{0}")]
    Rejected(String),
}

impl BackendError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::BackendProtocol,
            Self::Rejected(_) => ErrorKind::BackendRejected,
        }
    }

    /// Raw body excerpt kept for diagnostics, if this is a protocol error.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Self::Protocol { excerpt, .. } => Some(excerpt),
            Self::Timeout(_) | Self::Transport(_) | Self::Rejected(_) => None,
        }
    }

    pub(crate) fn protocol(status: u16, body: &str, reason: impl ToString) -> Self {
        Self::Protocol {
            status,
            excerpt: excerpt(body),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Transport(error)
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of `body`, cut on a character boundary.
#[must_use]
pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}
