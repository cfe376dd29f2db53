//! Error responses.

use prd_tracker_app::{
    auth::AuthServiceError,
    errors::ErrorKind,
    gateway::GatewayError,
    wire::{Acknowledged, Envelope, ErrorBody},
};
use salvo::{http::StatusCode, prelude::*, writing::Scribe};
use tracing::error;

/// Failure rendered as `{"status":"error","message":...,"kind":...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn internal() -> Self {
        Self::new(ErrorKind::Configuration, "internal server error")
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Backend-side failures are logged in full and surfaced generically.
    fn from_kind(
        kind: ErrorKind,
        detail: &dyn std::fmt::Display,
        excerpt: Option<&str>,
        user_message: String,
    ) -> Self {
        match kind {
            ErrorKind::BackendProtocol => {
                error!(
                    kind = kind.as_str(),
                    excerpt = excerpt.unwrap_or_default(),
                    "backend protocol error: {detail}"
                );
                Self::new(kind, "backend returned an unexpected response")
            }
            ErrorKind::Transport => {
                error!(kind = kind.as_str(), "backend transport error: {detail}");
                Self::new(kind, "backend is unreachable")
            }
            ErrorKind::Timeout => {
                error!(kind = kind.as_str(), "backend timeout: {detail}");
                Self::new(kind, "backend request timed out")
            }
            ErrorKind::Configuration => {
                error!(kind = kind.as_str(), "server misconfigured: {detail}");
                Self::internal()
            }
            ErrorKind::Auth
            | ErrorKind::Unauthenticated
            | ErrorKind::InvalidSession
            | ErrorKind::Forbidden
            | ErrorKind::Validation
            | ErrorKind::BackendRejected => Self::new(kind, user_message),
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        Self::from_kind(error.kind(), &error, error.excerpt(), error.to_string())
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self::from_kind(error.kind(), &error, error.excerpt(), error.to_string())
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status_code());
        res.render(Json(Envelope::<Acknowledged>::Error(ErrorBody::new(
            self.kind,
            self.message,
        ))));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex, PoisonError},
    };

    use prd_tracker_app::backend::BackendError;

    use super::*;

    /// Log sink shared between the subscriber and the assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);

            String::from_utf8_lossy(&buffer).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn protocol_excerpt_is_logged_not_returned() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let error = tracing::subscriber::with_default(subscriber, || {
            ApiError::from(GatewayError::Backend(BackendError::Protocol {
                status: 200,
                excerpt: "<!DOCTYPE html><title>Script function not found: doPost</title>"
                    .to_string(),
                reason: "expected value at line 1 column 1".to_string(),
            }))
        });

        let logged = logs.contents();

        assert!(
            logged.contains("Script function not found: doPost"),
            "excerpt is recorded for diagnostics: {logged}"
        );
        assert!(!error.message.contains("doPost"), "excerpt is not sent to clients");
    }

    #[test]
    fn protocol_details_are_not_leaked() {
        let error = ApiError::from(GatewayError::Backend(BackendError::Protocol {
            status: 200,
            excerpt: "<!DOCTYPE html>".to_string(),
            reason: "expected value".to_string(),
        }));

        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY, "protocol maps to 502");
        assert!(!error.message.contains("DOCTYPE"), "excerpt stays in the logs");
    }

    #[test]
    fn rejection_reason_is_kept() {
        let error = ApiError::from(AuthServiceError::Rejected(
            "Invalid username or password".to_string(),
        ));

        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED, "auth maps to 401");
        assert_eq!(error.message, "Invalid username or password", "reason is user-facing");
    }
}
