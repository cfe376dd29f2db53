//! Operator client errors.

use thiserror::Error;

use crate::{
    dashboard::SessionStoreError,
    domain::{documents::DocumentValidationError, workflow::WorkflowError},
    errors::ErrorKind,
    registry::RegistryError,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Normalised failure reported by the gateway.
    #[error("{message}")]
    Api { kind: ErrorKind, message: String },

    #[error("not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    InvalidDocument(#[from] DocumentValidationError),

    #[error("gateway request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("gateway request failed")]
    Transport(#[source] reqwest::Error),

    #[error("gateway returned an unexpected response ({status}): {reason}")]
    Protocol {
        status: u16,
        excerpt: String,
        reason: String,
    },

    #[error("a refresh is already in progress")]
    Busy,

    #[error("response arrived after the session changed and was discarded")]
    Stale,

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl ClientError {
    /// Taxonomy kind, when the failure has one.
    ///
    /// `Busy`, `Stale` and local storage failures are client-side conditions
    /// with no gateway counterpart.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            Self::NotLoggedIn => Some(ErrorKind::Unauthenticated),
            Self::Workflow(error) => Some(error.kind()),
            Self::Registry(error) => Some(error.kind()),
            Self::InvalidDocument(_) => Some(ErrorKind::Validation),
            Self::Timeout(_) => Some(ErrorKind::Timeout),
            Self::Transport(_) => Some(ErrorKind::Transport),
            Self::Protocol { .. } => Some(ErrorKind::BackendProtocol),
            Self::Busy | Self::Stale | Self::Store(_) => None,
        }
    }

    /// Whether the session must be torn down after this error.
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        match self.kind() {
            Some(kind) => kind.ends_session(),
            None => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Transport(error)
        }
    }
}
