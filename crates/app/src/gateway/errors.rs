//! Gateway errors.

use thiserror::Error;

use crate::{
    backend::BackendError,
    domain::{
        documents::{DocumentCode, DocumentValidationError},
        workflow::WorkflowError,
    },
    errors::ErrorKind,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    InvalidDocument(#[from] DocumentValidationError),

    #[error("document {0} does not exist")]
    UnknownDocument(DocumentCode),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl GatewayError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::InvalidDocument(_) | Self::UnknownDocument(_) => {
                ErrorKind::Validation
            }
            Self::Workflow(error) => error.kind(),
            Self::Backend(error) => error.kind(),
        }
    }

    /// Raw backend body excerpt behind a protocol failure.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Self::Backend(error) => error.excerpt(),
            Self::InvalidRequest(_)
            | Self::InvalidDocument(_)
            | Self::UnknownDocument(_)
            | Self::Workflow(_) => None,
        }
    }
}
