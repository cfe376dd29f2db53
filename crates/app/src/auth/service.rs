//! Session service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    auth::{AuthServiceError, Credentials, IssuedSession, SessionClaims, SessionSigner},
    backend::Backend,
};

/// Login against the backend and session-token verification.
#[derive(Clone)]
pub struct BackendSessionService {
    backend: Arc<dyn Backend>,
    signer: SessionSigner,
}

impl BackendSessionService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, signer: SessionSigner) -> Self {
        Self { backend, signer }
    }
}

impl std::fmt::Debug for BackendSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSessionService")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionService for BackendSessionService {
    async fn login(&self, credentials: &Credentials) -> Result<IssuedSession, AuthServiceError> {
        if credentials.is_blank() {
            return Err(AuthServiceError::MissingCredentials);
        }

        let identity = self
            .backend
            .login(credentials)
            .await
            .map_err(AuthServiceError::from)
            .inspect_err(|error| {
                warn!(username = %credentials.username, error = %error, "login.rejected");
            })?;

        let signed = self
            .signer
            .issue(&identity)
            .map_err(AuthServiceError::Issue)?;

        let expires_at = signed
            .claims
            .expires_at()
            .map_err(AuthServiceError::Issue)?;

        info!(user = %identity.name, role = %identity.role, "login.succeeded");

        Ok(IssuedSession {
            identity,
            token: signed.token,
            expires_at,
        })
    }

    fn authenticate_bearer(&self, bearer_token: &str) -> Result<SessionClaims, AuthServiceError> {
        if bearer_token.trim().is_empty() {
            return Err(AuthServiceError::Unauthenticated);
        }

        self.signer
            .verify(bearer_token)
            .map_err(AuthServiceError::InvalidSession)
    }
}

#[automock]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Check credentials with the backend and mint a session token.
    async fn login(&self, credentials: &Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Verify a bearer token and return its claims.
    fn authenticate_bearer(&self, bearer_token: &str) -> Result<SessionClaims, AuthServiceError>;
}
