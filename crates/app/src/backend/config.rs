//! Backend channel configuration.

use std::time::Duration;

use reqwest::Url;

use crate::{errors::ConfigurationError, secret::Secret};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirect hops followed within one logical backend call.
pub const MAX_REDIRECTS: usize = 10;

/// Where the backend lives and how the gateway proves itself to it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: Url,
    pub secret: Secret,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Validate raw settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is not an absolute http(s) URL or the
    /// secret is blank.
    pub fn new(url: &str, secret: &str, timeout: Duration) -> Result<Self, ConfigurationError> {
        Ok(Self {
            url: parse_http_url("BACKEND_URL", url)?,
            secret: Secret::new("BACKEND_SECRET", secret)?,
            timeout,
        })
    }
}

/// Parse an absolute `http` or `https` URL for the setting called `name`.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidUrl`] or, for a blank value,
/// [`ConfigurationError::Missing`].
pub fn parse_http_url(name: &'static str, raw: &str) -> Result<Url, ConfigurationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ConfigurationError::Missing { name });
    }

    let url = Url::parse(raw).map_err(|error| ConfigurationError::InvalidUrl {
        name,
        reason: error.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::InvalidUrl {
            name,
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }

    Ok(url)
}
