//! Server-held secrets.

use std::fmt;

use zeroize::Zeroize;

use crate::errors::ConfigurationError;

/// A non-blank secret value with redacted `Debug` output.
///
/// The value is wiped from memory on drop.
#[derive(Clone)]
pub struct Secret {
    value: String,
}

impl Secret {
    /// Wrap the raw value of the setting called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Missing`] when the value is blank.
    pub fn new(name: &'static str, raw: impl Into<String>) -> Result<Self, ConfigurationError> {
        let mut value = raw.into();

        if value.trim().is_empty() {
            value.zeroize();
            return Err(ConfigurationError::Missing { name });
        }

        Ok(Self { value })
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn blank_secret_is_a_configuration_error() {
        let result = Secret::new("SESSION_SECRET", "   ");

        assert!(matches!(
            result,
            Err(ConfigurationError::Missing {
                name: "SESSION_SECRET"
            })
        ));
    }

    #[test]
    fn debug_output_is_redacted() -> TestResult {
        let secret = Secret::new("BACKEND_SECRET", "hunter2")?;

        assert_eq!(format!("{secret:?}"), "Secret(**redacted**)");
        assert_eq!(secret.expose(), "hunter2");

        Ok(())
    }
}
