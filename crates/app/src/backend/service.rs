//! Backend service seam.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::Credentials,
    backend::BackendError,
    domain::{
        documents::{Document, DocumentCode, HistoryEntry, NewDocument},
        users::UserRef,
        workflow::AuthorizedTransition,
    },
};

/// The spreadsheet-backed system of record.
///
/// Every data call carries the acting identity; implementations attribute
/// mutations to it.
#[automock]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<UserRef, BackendError>;

    /// All documents in backend order. Rows that cannot be decoded are
    /// skipped.
    async fn list_documents(&self) -> Result<Vec<Document>, BackendError>;

    async fn add_document(
        &self,
        actor: &UserRef,
        document: &NewDocument,
    ) -> Result<Document, BackendError>;

    async fn update_status(
        &self,
        actor: &UserRef,
        transition: &AuthorizedTransition,
    ) -> Result<(), BackendError>;

    async fn history(
        &self,
        actor: &UserRef,
        code: &DocumentCode,
    ) -> Result<Vec<HistoryEntry>, BackendError>;
}
