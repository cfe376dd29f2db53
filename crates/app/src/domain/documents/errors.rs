//! Document errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status `{0}`")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}

#[derive(Debug, Error)]
pub enum DocumentDecodeError {
    #[error("invalid timestamp `{value}`")]
    Timestamp {
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error(transparent)]
    Status(#[from] UnknownStatus),

    #[error(transparent)]
    Invalid(#[from] DocumentValidationError),
}
