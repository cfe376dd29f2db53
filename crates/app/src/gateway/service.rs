//! Gateway service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    backend::Backend,
    domain::{
        documents::{Document, DocumentCode, NewDocument, Status, chronological},
        users::{Role, UserRef},
        workflow::{self, TransitionRequest},
    },
    gateway::{GatewayError, GatewayReply, GatewayRequest},
};

/// Forwards verified requests to the backend.
#[derive(Clone)]
pub struct BackendGateway {
    backend: Arc<dyn Backend>,
}

impl BackendGateway {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Current status of `code`, read from a fresh backend listing.
    async fn current_status(&self, code: &DocumentCode) -> Result<Status, GatewayError> {
        self.backend
            .list_documents()
            .await?
            .into_iter()
            .find(|document| &document.code == code)
            .map(|document| document.status)
            .ok_or_else(|| GatewayError::UnknownDocument(code.clone()))
    }

    async fn update_status(
        &self,
        actor: &UserRef,
        prd_code: &str,
        target: Status,
        comment: String,
    ) -> Result<GatewayReply, GatewayError> {
        let code = DocumentCode::parse(prd_code)?;

        // Cheap role check first so forbidden requests never cost a listing.
        workflow::permit(actor.role, target)?;

        let current = match actor.role {
            Role::Staff => Some(self.current_status(&code).await?),
            Role::Admin => None,
        };

        let transition = workflow::authorize(
            actor.role,
            current,
            TransitionRequest {
                code,
                target,
                comment,
            },
        )?;

        self.backend.update_status(actor, &transition).await?;

        info!(
            user = %actor.name,
            code = %transition.code,
            action = %transition.action,
            "document.status_changed"
        );

        Ok(GatewayReply::StatusUpdated)
    }
}

impl std::fmt::Debug for BackendGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendGateway").finish_non_exhaustive()
    }
}

#[async_trait]
impl GatewayService for BackendGateway {
    async fn list_documents(&self, _actor: &UserRef) -> Result<Vec<Document>, GatewayError> {
        Ok(self.backend.list_documents().await?)
    }

    #[instrument(
        name = "gateway.dispatch",
        skip(self, request),
        fields(user = %actor.name, role = %actor.role, action = request.action()),
        err
    )]
    async fn dispatch(
        &self,
        actor: &UserRef,
        request: GatewayRequest,
    ) -> Result<GatewayReply, GatewayError> {
        match request {
            GatewayRequest::Add {
                prd_number,
                app_name,
                status,
            } => {
                let document = NewDocument::new(&prd_number, &app_name, status)?;
                let added = self.backend.add_document(actor, &document).await?;

                info!(user = %actor.name, code = %added.code, "document.added");

                Ok(GatewayReply::Added(added))
            }
            GatewayRequest::UpdateStatus {
                prd_code,
                new_status,
                comment,
            } => {
                self.update_status(actor, &prd_code, new_status, comment)
                    .await
            }
            GatewayRequest::GetHistory { prd_code } => {
                let code = DocumentCode::parse(&prd_code)?;
                let entries = self.backend.history(actor, &code).await?;

                Ok(GatewayReply::History(chronological(entries)))
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait GatewayService: Send + Sync {
    /// Current document rows.
    async fn list_documents(&self, actor: &UserRef) -> Result<Vec<Document>, GatewayError>;

    /// Perform `request` on behalf of `actor`, the verified session identity.
    async fn dispatch(
        &self,
        actor: &UserRef,
        request: GatewayRequest,
    ) -> Result<GatewayReply, GatewayError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        backend::{BackendError, MockBackend},
        domain::workflow::Action,
        errors::ErrorKind,
    };

    fn alice() -> UserRef {
        UserRef::new("alice", Role::Staff)
    }

    fn carol() -> UserRef {
        UserRef::new("carol", Role::Admin)
    }

    fn listing(status: Status) -> TestResult<Vec<Document>> {
        Ok(vec![Document {
            timestamp: "2024-01-01T10:00:00Z".parse()?,
            code: DocumentCode::parse("PRD-001")?,
            app_name: "App A".to_string(),
            owner: "alice".to_string(),
            status,
        }])
    }

    fn update(target: Status, comment: &str) -> GatewayRequest {
        GatewayRequest::UpdateStatus {
            prd_code: "PRD-001".to_string(),
            new_status: target,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn staff_submission_is_forwarded_with_verified_identity() -> TestResult {
        let mut backend = MockBackend::new();
        let rows = listing(Status::Open)?;

        backend
            .expect_list_documents()
            .once()
            .return_once(move || Ok(rows));

        backend
            .expect_update_status()
            .once()
            .withf(|actor, transition| {
                actor == &alice()
                    && transition.action == Action::SubmitForReview
                    && transition.comment.as_str() == "done testing"
            })
            .return_once(|_, _| Ok(()));

        let reply = BackendGateway::new(Arc::new(backend))
            .dispatch(&alice(), update(Status::NeedReview, "done testing"))
            .await?;

        assert_eq!(reply, GatewayReply::StatusUpdated);

        Ok(())
    }

    #[tokio::test]
    async fn staff_set_status_is_forbidden_without_touching_backend() -> TestResult {
        let mut backend = MockBackend::new();

        backend.expect_list_documents().never();
        backend.expect_update_status().never();

        let error = BackendGateway::new(Arc::new(backend))
            .dispatch(&alice(), update(Status::Done, "ship it"))
            .await
            .err()
            .ok_or("expected staff set-status to fail")?;

        assert_eq!(error.kind(), ErrorKind::Forbidden);

        Ok(())
    }

    #[tokio::test]
    async fn staff_cannot_submit_from_done() -> TestResult {
        let mut backend = MockBackend::new();
        let rows = listing(Status::Done)?;

        backend
            .expect_list_documents()
            .once()
            .return_once(move || Ok(rows));
        backend.expect_update_status().never();

        let error = BackendGateway::new(Arc::new(backend))
            .dispatch(&alice(), update(Status::NeedReview, "again"))
            .await
            .err()
            .ok_or("expected precondition failure")?;

        assert_eq!(error.kind(), ErrorKind::Forbidden);

        Ok(())
    }

    #[tokio::test]
    async fn staff_submission_for_unknown_code_is_validation_error() -> TestResult {
        let mut backend = MockBackend::new();

        backend
            .expect_list_documents()
            .once()
            .return_once(|| Ok(Vec::new()));
        backend.expect_update_status().never();

        let error = BackendGateway::new(Arc::new(backend))
            .dispatch(&alice(), update(Status::NeedReview, "ready"))
            .await
            .err()
            .ok_or("expected unknown document")?;

        assert!(matches!(error, GatewayError::UnknownDocument(_)));
        assert_eq!(error.kind(), ErrorKind::Validation);

        Ok(())
    }

    #[tokio::test]
    async fn admin_empty_comment_is_rejected_before_backend() -> TestResult {
        let mut backend = MockBackend::new();

        backend.expect_list_documents().never();
        backend.expect_update_status().never();

        let error = BackendGateway::new(Arc::new(backend))
            .dispatch(&carol(), update(Status::Done, ""))
            .await
            .err()
            .ok_or("expected missing comment")?;

        assert_eq!(error.kind(), ErrorKind::Validation);

        Ok(())
    }

    #[tokio::test]
    async fn backend_rejection_is_relayed() -> TestResult {
        let mut backend = MockBackend::new();

        backend
            .expect_update_status()
            .once()
            .return_once(|_, _| Err(BackendError::Rejected("PRD not found".to_string())));

        let error = BackendGateway::new(Arc::new(backend))
            .dispatch(&carol(), update(Status::Done, "approved"))
            .await
            .err()
            .ok_or("expected backend rejection")?;

        assert_eq!(error.kind(), ErrorKind::BackendRejected);
        assert_eq!(error.to_string(), "PRD not found");

        Ok(())
    }

    #[tokio::test]
    async fn add_attributes_document_to_actor() -> TestResult {
        let mut backend = MockBackend::new();
        let created = listing(Status::Open)?.remove(0);
        let expected = created.clone();

        backend
            .expect_add_document()
            .once()
            .withf(|actor, document| {
                actor == &alice() && document.prd_number == "001" && document.app_name == "App A"
            })
            .return_once(move |_, _| Ok(created));

        let reply = BackendGateway::new(Arc::new(backend))
            .dispatch(
                &alice(),
                GatewayRequest::Add {
                    prd_number: " 001 ".to_string(),
                    app_name: "App A".to_string(),
                    status: Status::Open,
                },
            )
            .await?;

        assert_eq!(reply, GatewayReply::Added(expected));

        Ok(())
    }

    #[tokio::test]
    async fn history_is_returned_oldest_first() -> TestResult {
        let mut backend = MockBackend::new();
        let entries = vec![
            crate::domain::documents::HistoryEntry {
                timestamp: "2024-01-03T00:00:00Z".parse()?,
                user: "carol".to_string(),
                activity: "Done".to_string(),
                details: "approved".to_string(),
                comment: Some("approved".to_string()),
            },
            crate::domain::documents::HistoryEntry {
                timestamp: "2024-01-02T00:00:00Z".parse()?,
                user: "alice".to_string(),
                activity: "Need Review".to_string(),
                details: "ready".to_string(),
                comment: Some("ready".to_string()),
            },
        ];

        backend
            .expect_history()
            .once()
            .withf(|actor, code| actor == &alice() && code.as_str() == "PRD-001")
            .return_once(move |_, _| Ok(entries));

        let reply = BackendGateway::new(Arc::new(backend))
            .dispatch(
                &alice(),
                GatewayRequest::GetHistory {
                    prd_code: "PRD-001".to_string(),
                },
            )
            .await?;

        let GatewayReply::History(history) = reply else {
            return Err("expected history reply".into());
        };

        let users: Vec<_> = history.iter().map(|entry| entry.user.as_str()).collect();

        assert_eq!(users, ["alice", "carol"]);

        Ok(())
    }
}
