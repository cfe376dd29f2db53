//! JSON envelopes shared by the backend channel and the gateway API.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{documents::DocumentRecord, users::Role},
    errors::ErrorKind,
};

/// `{"status": "success", ...}` or `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success(T),
    Error(ErrorBody),
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ErrorBody> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(body) => Err(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: Some(kind),
        }
    }
}

/// Success payload with nothing but the status tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {}

/// Success payload wrapping a `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Identity fields returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginIdentity {
    pub user: String,
    pub role: String,
}

/// Successful login as returned to the operator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    pub user: String,
    pub role: Role,
    pub token: String,
}

impl std::fmt::Debug for LoginReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReply")
            .field("user", &self.user)
            .field("role", &self.role)
            .field("token", &"**redacted**")
            .finish()
    }
}

/// `{"status":"success","data":{...}}` after `add`.
pub type AddedReply = Data<DocumentRecord>;
