//! Gateway API as seen by the operator client.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Response, Url, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    auth::Credentials,
    backend::{decode_rows, excerpt, parse_http_url},
    dashboard::{ClientError, StoredSession},
    domain::{
        documents::{Document, DocumentRecord, HistoryEntry},
        users::UserRef,
    },
    errors::{ConfigurationError, ErrorKind},
    gateway::{GatewayReply, GatewayRequest},
    wire::{Acknowledged, Data, Envelope, LoginReply},
};

#[automock]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<StoredSession, ClientError>;

    async fn documents(&self, token: &str) -> Result<Vec<Document>, ClientError>;

    async fn send(&self, token: &str, request: &GatewayRequest)
    -> Result<GatewayReply, ClientError>;
}

/// HTTP client for the gateway's `/api/auth` and `/api/proxy` endpoints.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    auth_url: Url,
    proxy_url: Url,
    http: Client,
}

impl GatewayClient {
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigurationError> {
        let mut base = parse_http_url("PRD_GATEWAY_URL", base_url)?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path).map_err(|error| ConfigurationError::InvalidUrl {
                name: "PRD_GATEWAY_URL",
                reason: error.to_string(),
            })
        };

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigurationError::HttpClient)?;

        Ok(Self {
            auth_url: join("api/auth")?,
            proxy_url: join("api/proxy")?,
            http,
        })
    }
}

/// Decode a gateway response body into `T`, normalising error envelopes.
async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<Envelope<T>>(&body) {
        Ok(Envelope::Success(value)) => Ok(value),
        Ok(Envelope::Error(error)) => Err(ClientError::Api {
            kind: error
                .kind
                .unwrap_or_else(|| ErrorKind::from_http_status(status.as_u16())),
            message: error.message,
        }),
        Err(error) => Err(unreadable(status.as_u16(), status.is_success(), &body, &error)),
    }
}

/// A body that is not a recognisable envelope. Failing statuses still map to
/// their kind so that, for example, a bare 401 ends the session.
fn unreadable(status: u16, success: bool, body: &str, reason: &impl ToString) -> ClientError {
    if success {
        ClientError::Protocol {
            status,
            excerpt: excerpt(body),
            reason: reason.to_string(),
        }
    } else {
        ClientError::Api {
            kind: ErrorKind::from_http_status(status),
            message: excerpt(body),
        }
    }
}

#[async_trait]
impl DashboardApi for GatewayClient {
    async fn login(&self, credentials: &Credentials) -> Result<StoredSession, ClientError> {
        let response = self
            .http
            .post(self.auth_url.clone())
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let reply: LoginReply = read(response).await?;

        Ok(StoredSession {
            token: reply.token,
            user: UserRef::new(reply.user, reply.role),
        })
    }

    async fn documents(&self, token: &str) -> Result<Vec<Document>, ClientError> {
        let response = self
            .http
            .get(self.proxy_url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(rows)) if status.is_success() => Ok(decode_rows(rows)),
            Ok(other) => match serde_json::from_value::<Envelope<Acknowledged>>(other) {
                Ok(Envelope::Error(error)) => Err(ClientError::Api {
                    kind: error
                        .kind
                        .unwrap_or_else(|| ErrorKind::from_http_status(status.as_u16())),
                    message: error.message,
                }),
                Ok(Envelope::Success(_)) | Err(_) => Err(unreadable(
                    status.as_u16(),
                    status.is_success(),
                    &body,
                    &"expected a list of document rows",
                )),
            },
            Err(error) => Err(unreadable(status.as_u16(), status.is_success(), &body, &error)),
        }
    }

    async fn send(
        &self,
        token: &str,
        request: &GatewayRequest,
    ) -> Result<GatewayReply, ClientError> {
        let response = self
            .http
            .post(self.proxy_url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();

        match request {
            GatewayRequest::Add { .. } => {
                let added: Data<DocumentRecord> = read(response).await?;

                Document::try_from(added.data)
                    .map(GatewayReply::Added)
                    .map_err(|error| ClientError::Protocol {
                        status,
                        excerpt: String::new(),
                        reason: error.to_string(),
                    })
            }
            GatewayRequest::UpdateStatus { .. } => {
                read::<Acknowledged>(response).await?;

                Ok(GatewayReply::StatusUpdated)
            }
            GatewayRequest::GetHistory { .. } => {
                let history: Data<Vec<HistoryEntry>> = read(response).await?;

                Ok(GatewayReply::History(history.data))
            }
        }
    }
}
