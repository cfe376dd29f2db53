//! App Context

use std::sync::Arc;

use crate::{
    auth::{BackendSessionService, SessionService, SessionSigner},
    backend::{Backend, BackendConfig, HttpBackend},
    errors::ConfigurationError,
    gateway::{BackendGateway, GatewayService},
    secret::Secret,
};

/// Services the gateway server hands to its handlers.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<dyn SessionService>,
    pub gateway: Arc<dyn GatewayService>,
}

impl AppContext {
    /// Wire the HTTP backend, session signer and gateway together.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend HTTP client cannot be built.
    pub fn from_config(
        backend: BackendConfig,
        session_secret: &Secret,
    ) -> Result<Self, ConfigurationError> {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(backend)?);

        Ok(Self::with_backend(backend, SessionSigner::new(session_secret)))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>, signer: SessionSigner) -> Self {
        Self {
            session: Arc::new(BackendSessionService::new(Arc::clone(&backend), signer)),
            gateway: Arc::new(BackendGateway::new(backend)),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
