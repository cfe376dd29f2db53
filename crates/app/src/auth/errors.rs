//! Auth service errors.

use thiserror::Error;

use crate::{auth::SessionTokenError, backend::BackendError, errors::ErrorKind};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error("missing bearer token")]
    Unauthenticated,

    #[error("session is invalid or expired")]
    InvalidSession(#[source] SessionTokenError),

    #[error("failed to issue session token")]
    Issue(#[source] SessionTokenError),

    #[error(transparent)]
    Backend(BackendError),
}

impl AuthServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials => ErrorKind::Validation,
            Self::Rejected(_) => ErrorKind::Auth,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::InvalidSession(_) => ErrorKind::InvalidSession,
            Self::Issue(_) => ErrorKind::Configuration,
            Self::Backend(error) => error.kind(),
        }
    }

    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Self::Backend(error) => error.excerpt(),
            Self::MissingCredentials
            | Self::Rejected(_)
            | Self::Unauthenticated
            | Self::InvalidSession(_)
            | Self::Issue(_) => None,
        }
    }
}

impl From<BackendError> for AuthServiceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Rejected(message) => Self::Rejected(message),
            other => Self::Backend(other),
        }
    }
}
