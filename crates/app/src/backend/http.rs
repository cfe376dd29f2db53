//! HTTP client for the spreadsheet service.

use async_trait::async_trait;
use reqwest::{Client, Response, redirect::Policy};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    auth::Credentials,
    backend::{Backend, BackendConfig, BackendError, MAX_REDIRECTS},
    domain::{
        documents::{Document, DocumentCode, HistoryEntry, NewDocument, Status},
        users::{Role, UserRef},
        workflow::AuthorizedTransition,
    },
    errors::ConfigurationError,
    wire::{Acknowledged, AddedReply, Data, Envelope, LoginIdentity},
};

/// Request bodies understood by the service, tagged by `action`.
#[derive(Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum BackendAction<'a> {
    Login {
        username: &'a str,
        password: &'a str,
    },
    Add {
        prd_number: &'a str,
        app_name: &'a str,
        status: Status,
        user: &'a str,
        role: Role,
    },
    UpdateStatus {
        prd_code: &'a DocumentCode,
        new_status: Status,
        comment: &'a str,
        user: &'a str,
        role: Role,
    },
    GetHistory {
        prd_code: &'a DocumentCode,
        user: &'a str,
        role: Role,
    },
}

impl BackendAction<'_> {
    const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Add { .. } => "add",
            Self::UpdateStatus { .. } => "updateStatus",
            Self::GetHistory { .. } => "getHistory",
        }
    }
}

/// Outgoing body with the shared secret injected next to the action fields.
#[derive(Serialize)]
struct WithSecret<'a> {
    #[serde(flatten)]
    action: &'a BackendAction<'a>,
    secret: &'a str,
}

/// Raw response: HTTP status and body text.
struct RawReply {
    status: u16,
    body: String,
}

impl RawReply {
    async fn read(response: Response) -> Result<Self, BackendError> {
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(Self { status, body })
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        serde_json::from_str(&self.body)
            .map_err(|error| BackendError::protocol(self.status, &self.body, error))
    }

    /// Decode a tagged envelope; an `error` answer becomes `Rejected`.
    fn envelope<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        self.decode::<Envelope<T>>()?
            .into_result()
            .map_err(|body| BackendError::Rejected(body.message))
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    http: Client,
}

impl HttpBackend {
    /// Build a client with the configured timeout and redirect policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, ConfigurationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(ConfigurationError::HttpClient)?;

        Ok(Self { config, http })
    }

    async fn post(&self, action: &BackendAction<'_>) -> Result<RawReply, BackendError> {
        debug!(action = action.name(), "backend.request");

        let response = self
            .http
            .post(self.config.url.clone())
            .json(&WithSecret {
                action,
                secret: self.config.secret.expose(),
            })
            .send()
            .await?;

        RawReply::read(response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<UserRef, BackendError> {
        let reply = self
            .post(&BackendAction::Login {
                username: &credentials.username,
                password: &credentials.password,
            })
            .await?;

        let identity: LoginIdentity = reply.envelope()?;

        let role = identity
            .role
            .parse::<Role>()
            .map_err(|error| BackendError::protocol(reply.status, &reply.body, error))?;

        Ok(UserRef::new(identity.user, role))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, BackendError> {
        debug!("backend.request.list");

        let response = self
            .http
            .get(self.config.url.clone())
            .query(&[("secret", self.config.secret.expose())])
            .send()
            .await?;

        let reply = RawReply::read(response).await?;

        match reply.decode::<Value>()? {
            Value::Array(rows) => Ok(decode_rows(rows)),
            other => match serde_json::from_value::<Envelope<Acknowledged>>(other) {
                Ok(Envelope::Error(body)) => Err(BackendError::Rejected(body.message)),
                Ok(Envelope::Success(_)) | Err(_) => Err(BackendError::protocol(
                    reply.status,
                    &reply.body,
                    "expected a list of document rows",
                )),
            },
        }
    }

    async fn add_document(
        &self,
        actor: &UserRef,
        document: &NewDocument,
    ) -> Result<Document, BackendError> {
        let reply = self
            .post(&BackendAction::Add {
                prd_number: &document.prd_number,
                app_name: &document.app_name,
                status: document.status,
                user: &actor.name,
                role: actor.role,
            })
            .await?;

        let added: AddedReply = reply.envelope()?;

        Document::try_from(added.data)
            .map_err(|error| BackendError::protocol(reply.status, &reply.body, error))
    }

    async fn update_status(
        &self,
        actor: &UserRef,
        transition: &AuthorizedTransition,
    ) -> Result<(), BackendError> {
        let reply = self
            .post(&BackendAction::UpdateStatus {
                prd_code: &transition.code,
                new_status: transition.target(),
                comment: transition.comment.as_str(),
                user: &actor.name,
                role: actor.role,
            })
            .await?;

        reply.envelope::<Acknowledged>().map(|_| ())
    }

    async fn history(
        &self,
        actor: &UserRef,
        code: &DocumentCode,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let reply = self
            .post(&BackendAction::GetHistory {
                prd_code: code,
                user: &actor.name,
                role: actor.role,
            })
            .await?;

        reply
            .envelope::<Data<Vec<HistoryEntry>>>()
            .map(|history| history.data)
    }
}

/// Decode list rows, skipping any that do not describe a valid document.
///
/// Duplicate codes are kept here; the registry resolves them.
pub fn decode_rows(rows: Vec<Value>) -> Vec<Document> {
    let total = rows.len();

    let documents: Vec<Document> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            serde_json::from_value::<Document>(row)
                .inspect_err(|error| warn!(row = index, error = %error, "backend.row.skipped"))
                .ok()
        })
        .collect();

    if documents.len() < total {
        debug!(kept = documents.len(), total, "backend.rows.decoded");
    }

    documents
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::workflow::{TransitionRequest, authorize},
        errors::ErrorKind,
        test::http_stub::{StubResponse, serve},
    };

    fn backend(url: &str, timeout: Duration) -> Result<HttpBackend, ConfigurationError> {
        HttpBackend::new(BackendConfig::new(url, "gateway-secret", timeout)?)
    }

    #[test]
    fn decode_rows_skips_header_and_malformed_rows() {
        let rows = vec![
            json!(["Timestamp", "PRD Code", "App", "User", "Status"]),
            json!(["2024-01-01T10:00:00Z", "PRD-001", "App A", "alice", "Open"]),
            json!(["2024-01-02T10:00:00Z", "PRD-002", "App B", "bob", "Pending"]),
            json!({"unexpected": true}),
        ];

        let documents = decode_rows(rows);

        assert_eq!(documents.len(), 1);
        assert!(documents.iter().all(|document| document.code.as_str() == "PRD-001"));
    }

    #[test]
    fn secret_is_injected_beside_action_fields() -> TestResult {
        let code = DocumentCode::parse("PRD-001")?;
        let action = BackendAction::GetHistory {
            prd_code: &code,
            user: "alice",
            role: Role::Staff,
        };

        let body = serde_json::to_value(WithSecret {
            action: &action,
            secret: "s3cret",
        })?;

        assert_eq!(
            body,
            json!({
                "action": "getHistory",
                "prdCode": "PRD-001",
                "user": "alice",
                "role": "staff",
                "secret": "s3cret",
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_sends_secret_as_query_parameter() -> TestResult {
        let stub = serve(vec![StubResponse::json(
            200,
            r#"[["2024-01-01T10:00:00Z","PRD-001","App A","alice","Open"]]"#,
        )])
        .await?;

        let documents = backend(&stub.url("/exec"), Duration::from_secs(5))?
            .list_documents()
            .await?;

        let requests = stub.finish().await?;

        assert_eq!(documents.len(), 1);
        assert!(
            requests
                .first()
                .is_some_and(|request| request.starts_with("GET /exec?secret=gateway-secret "))
        );

        Ok(())
    }

    #[tokio::test]
    async fn html_error_page_becomes_protocol_error() -> TestResult {
        let page = format!("<!DOCTYPE html><html><body>{}</body></html>", "x".repeat(400));
        let stub = serve(vec![StubResponse::html(200, &page)]).await?;

        let error = backend(&stub.url("/exec"), Duration::from_secs(5))?
            .list_documents()
            .await
            .err()
            .ok_or("expected a protocol error")?;

        assert_eq!(error.kind(), ErrorKind::BackendProtocol);
        assert!(matches!(
            &error,
            BackendError::Protocol { excerpt, .. } if excerpt.starts_with("<!DOCTYPE html>") && excerpt.chars().count() == 200
        ));

        Ok(())
    }

    #[tokio::test]
    async fn login_failure_reason_is_propagated() -> TestResult {
        let stub = serve(vec![StubResponse::json(
            200,
            r#"{"status":"error","message":"Invalid username or password"}"#,
        )])
        .await?;

        let result = backend(&stub.url("/exec"), Duration::from_secs(5))?
            .login(&Credentials::new("alice", "wrong"))
            .await;

        let requests = stub.finish().await?;

        assert!(matches!(result, Err(BackendError::Rejected(message)) if message == "Invalid username or password"));
        assert!(requests.first().is_some_and(|request| {
            request.contains(r#""action":"login""#) && request.contains(r#""secret":"gateway-secret""#)
        }));

        Ok(())
    }

    #[tokio::test]
    async fn post_redirect_is_followed() -> TestResult {
        let stub = serve(vec![
            StubResponse::redirect("/echo"),
            StubResponse::json(200, r#"{"status":"success"}"#),
        ])
        .await?;

        let transition = authorize(
            Role::Admin,
            None,
            TransitionRequest {
                code: DocumentCode::parse("PRD-001")?,
                target: Status::Done,
                comment: "shipped".to_string(),
            },
        )?;

        backend(&stub.url("/exec"), Duration::from_secs(5))?
            .update_status(&UserRef::new("carol", Role::Admin), &transition)
            .await?;

        let requests = stub.finish().await?;

        assert_eq!(requests.len(), 2);
        assert!(requests.get(1).is_some_and(|request| request.starts_with("GET /echo ")));

        Ok(())
    }

    #[tokio::test]
    async fn slow_backend_times_out() -> TestResult {
        let stub = serve(vec![StubResponse::stall()]).await?;

        let error = backend(&stub.url("/exec"), Duration::from_millis(100))?
            .list_documents()
            .await
            .err()
            .ok_or("expected a timeout")?;

        assert_eq!(error.kind(), ErrorKind::Timeout);

        Ok(())
    }
}
