//! Workflow errors.

use thiserror::Error;

use crate::{
    domain::{documents::Status, users::Role, workflow::Action},
    errors::ErrorKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{role} users may not {action}")]
    Forbidden { role: Role, action: Action },

    #[error("{role} users may not move a document from {from} to {to}")]
    IllegalTransition { role: Role, from: Status, to: Status },

    #[error("a comment is required to change status")]
    MissingComment,
}

impl WorkflowError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden { .. } | Self::IllegalTransition { .. } => ErrorKind::Forbidden,
            Self::MissingComment => ErrorKind::Validation,
        }
    }
}
