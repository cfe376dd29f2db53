//! Registry errors.

use thiserror::Error;

use crate::{domain::documents::DocumentCode, errors::ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    #[error("document {0} is not in the registry")]
    UnknownDocument(DocumentCode),
}

impl RegistryError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
