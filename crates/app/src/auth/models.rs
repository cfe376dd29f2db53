//! Auth data models.

use std::fmt;

use jiff::Timestamp;
use serde::Deserialize;

use crate::domain::users::UserRef;

/// Username and password as submitted by the operator.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.username.trim().is_empty() || self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Result of a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub identity: UserRef,
    pub token: String,
    pub expires_at: Timestamp,
}

impl fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedSession")
            .field("identity", &self.identity)
            .field("token", &"**redacted**")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
