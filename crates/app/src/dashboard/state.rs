//! Dashboard state and intents.

use std::{num::NonZeroUsize, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    auth::Credentials,
    dashboard::{ClientError, DashboardApi, SessionStore, StoredSession},
    domain::{
        documents::{Document, DocumentCode, HistoryEntry, NewDocument, Status, chronological},
        users::UserRef,
        workflow::{self, LegalActions, TransitionRequest, legal_actions},
    },
    errors::ErrorKind,
    gateway::{GatewayReply, GatewayRequest},
    registry::{Registry, RegistryError, SortColumn, SortDirection},
};

/// Proof that a network intent started under a particular session epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    epoch: u64,
}

/// A `load` that has been started but not yet applied.
#[derive(Debug)]
#[must_use]
pub struct PendingLoad {
    ticket: Ticket,
    token: String,
}

impl PendingLoad {
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// A committed status change.
///
/// `history` is `None` when the follow-up history fetch failed; the change
/// itself still went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub code: DocumentCode,
    pub status: Status,
    pub history: Option<Vec<HistoryEntry>>,
}

/// Operator-facing application state.
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    store: Arc<dyn SessionStore>,
    session: Option<StoredSession>,
    registry: Registry,
    epoch: u64,
    loading: bool,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("session", &self.session)
            .field("registry", &self.registry)
            .field("epoch", &self.epoch)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build a dashboard, resuming any session persisted in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub fn restore(
        api: Arc<dyn DashboardApi>,
        store: Arc<dyn SessionStore>,
        page_size: NonZeroUsize,
    ) -> Result<Self, ClientError> {
        let session = store.load()?;

        Ok(Self {
            api,
            store,
            session,
            registry: Registry::new(page_size),
            epoch: 0,
            loading: false,
        })
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserRef> {
        self.session.as_ref().map(|session| &session.user)
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Actions to offer for `document` to the signed-in operator.
    #[must_use]
    pub fn legal_actions(&self, document: &Document) -> LegalActions {
        self.user()
            .map(|user| legal_actions(user.role, document.status))
            .unwrap_or_default()
    }

    /// Sign in and persist the new session.
    ///
    /// Any earlier session is signed out first, which also invalidates
    /// anything still in flight.
    ///
    /// # Errors
    ///
    /// Returns an error for blank credentials, a rejected login, or a failure
    /// to persist the session.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserRef, ClientError> {
        let credentials = Credentials::new(username.trim(), password);

        if credentials.is_blank() {
            return Err(ClientError::Api {
                kind: ErrorKind::Validation,
                message: "username and password are required".to_string(),
            });
        }

        self.logout()?;
        let ticket = self.ticket();

        let api = Arc::clone(&self.api);
        let session = api.login(&credentials).await?;

        self.check(ticket)?;
        self.store.save(&session)?;

        info!(user = %session.user.name, role = %session.user.role, "dashboard.login");

        let user = session.user.clone();
        self.session = Some(session);

        Ok(user)
    }

    /// Sign out, clearing persisted state and the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be removed; the
    /// in-memory session is cleared regardless.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.reset();

        self.store.clear()?;

        Ok(())
    }

    /// Start a refresh of the mirror.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Busy`] while another load is in flight and
    /// [`ClientError::NotLoggedIn`] without a session.
    pub fn begin_load(&mut self) -> Result<PendingLoad, ClientError> {
        if self.loading {
            return Err(ClientError::Busy);
        }

        let token = self.token()?.to_string();

        self.loading = true;

        Ok(PendingLoad {
            ticket: self.ticket(),
            token,
        })
    }

    /// Apply the outcome of a load started with [`Dashboard::begin_load`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Stale`] if the session changed meanwhile, or the
    /// load's own error.
    pub fn complete_load(
        &mut self,
        pending: PendingLoad,
        result: Result<Vec<Document>, ClientError>,
    ) -> Result<usize, ClientError> {
        self.check(pending.ticket)?;
        self.loading = false;

        let documents = self.absorb(result)?;
        let count = documents.len();

        self.registry.load(documents);

        debug!(count, "dashboard.loaded");

        Ok(count)
    }

    /// Fetch all documents and replace the mirror.
    ///
    /// # Errors
    ///
    /// See [`Dashboard::begin_load`] and [`Dashboard::complete_load`].
    pub async fn load(&mut self) -> Result<usize, ClientError> {
        let pending = self.begin_load()?;

        let api = Arc::clone(&self.api);
        let result = api.documents(pending.token()).await;

        self.complete_load(pending, result)
    }

    /// Register a new document and show it first in the view.
    ///
    /// # Errors
    ///
    /// Returns an error for blank fields or when the gateway refuses.
    pub async fn add(
        &mut self,
        prd_number: &str,
        app_name: &str,
        status: Status,
    ) -> Result<Document, ClientError> {
        let document = NewDocument::new(prd_number, app_name, status)?;

        let reply = self
            .send(GatewayRequest::Add {
                prd_number: document.prd_number,
                app_name: document.app_name,
                status: document.status,
            })
            .await?;

        let GatewayReply::Added(added) = reply else {
            return Err(unexpected_reply("add"));
        };

        self.registry.apply_optimistic_insert(added.clone());

        Ok(added)
    }

    pub fn search(&mut self, keyword: &str) {
        self.registry.search(keyword);
    }

    pub fn sort(&mut self, column: SortColumn, direction: Option<SortDirection>) {
        self.registry.sort(column, direction);
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::PageOutOfRange`] and leaves the page alone
    /// when `page` does not exist.
    pub fn go_to_page(&mut self, page: usize) -> Result<&[Document], ClientError> {
        Ok(self.registry.go_to_page(page)?)
    }

    /// Change a document's status and fetch its refreshed history.
    ///
    /// The workflow rules are checked locally against the mirrored status
    /// before anything is sent. Once the gateway accepts the change, a failed
    /// history fetch is logged and reported as a missing history only.
    ///
    /// # Errors
    ///
    /// Returns workflow errors (`Forbidden`, missing comment), registry errors
    /// for unknown codes, or the gateway's error for the status update.
    pub async fn request_transition(
        &mut self,
        code: &str,
        target: Status,
        comment: &str,
    ) -> Result<TransitionOutcome, ClientError> {
        let role = self.user().ok_or(ClientError::NotLoggedIn)?.role;
        let code = DocumentCode::parse(code)?;

        let current = self
            .registry
            .find(&code)
            .map(|document| document.status)
            .ok_or_else(|| RegistryError::UnknownDocument(code.clone()))?;

        let transition = workflow::authorize(
            role,
            Some(current),
            TransitionRequest {
                code: code.clone(),
                target,
                comment: comment.to_string(),
            },
        )?;

        self.send(GatewayRequest::UpdateStatus {
            prd_code: code.to_string(),
            new_status: transition.target(),
            comment: transition.comment.to_string(),
        })
        .await?;

        let status = transition.target();

        if let Err(error) = self.registry.apply_optimistic_status_update(&code, status) {
            debug!(code = %code, error = %error, "dashboard.mirror_update_skipped");
        }

        let history = match self.history(code.as_str()).await {
            Ok(entries) => Some(entries),
            Err(error) => {
                warn!(code = %code, error = %error, "dashboard.history_refresh_failed");
                None
            }
        };

        Ok(TransitionOutcome {
            code,
            status,
            history,
        })
    }

    /// Audit trail for `code`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank code or when the gateway refuses.
    pub async fn history(&mut self, code: &str) -> Result<Vec<HistoryEntry>, ClientError> {
        let code = DocumentCode::parse(code)?;

        let reply = self
            .send(GatewayRequest::GetHistory {
                prd_code: code.to_string(),
            })
            .await?;

        let GatewayReply::History(entries) = reply else {
            return Err(unexpected_reply("getHistory"));
        };

        Ok(chronological(entries))
    }

    /// Send `request` under the current session, discarding late results.
    async fn send(&mut self, request: GatewayRequest) -> Result<GatewayReply, ClientError> {
        let ticket = self.ticket();
        let token = self.token()?.to_string();

        let api = Arc::clone(&self.api);
        let result = api.send(&token, &request).await;

        self.check(ticket)?;
        self.absorb(result)
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(ClientError::NotLoggedIn)
    }

    fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    fn check(&self, ticket: Ticket) -> Result<(), ClientError> {
        if ticket.epoch != self.epoch {
            debug!(started = ticket.epoch, current = self.epoch, "dashboard.stale_response");
            return Err(ClientError::Stale);
        }

        Ok(())
    }

    /// Pass a result through, tearing the session down on auth failures.
    fn absorb<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        result.inspect_err(|error| {
            if error.ends_session() {
                warn!(error = %error, "dashboard.session_ended");
                self.teardown();
            }
        })
    }

    fn teardown(&mut self) {
        self.reset();

        if let Err(error) = self.store.clear() {
            warn!(error = %error, "dashboard.session_clear_failed");
        }
    }

    /// Forget the session in memory and invalidate anything in flight.
    fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.loading = false;
        self.session = None;
        self.registry = Registry::new(self.registry.limit());
    }
}

fn unexpected_reply(action: &str) -> ClientError {
    ClientError::Protocol {
        status: 200,
        excerpt: String::new(),
        reason: format!("unexpected reply to {action}"),
    }
}
