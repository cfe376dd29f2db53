//! Workflow actions

use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::domain::{documents::Status, users::Role};

/// Statuses a staff member may submit for review from.
pub const STAFF_REVIEWABLE: [Status; 3] = [Status::Open, Status::OnProgress, Status::NeedRevise];

/// Something an operator can do to a document's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SubmitForReview,
    SetStatus(Status),
}

/// Action set returned by [`legal_actions`].
pub type LegalActions = SmallVec<[Action; 5]>;

impl Action {
    /// Interpret a requested target status for the given role.
    #[must_use]
    pub const fn for_target(role: Role, target: Status) -> Self {
        match (role, target) {
            (Role::Staff, Status::NeedReview) => Self::SubmitForReview,
            _ => Self::SetStatus(target),
        }
    }

    /// Status the document ends up in.
    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::SubmitForReview => Status::NeedReview,
            Self::SetStatus(status) => status,
        }
    }

    /// Whether `role` may perform this kind of action at all.
    #[must_use]
    pub const fn permitted_for(self, role: Role) -> bool {
        match (self, role) {
            (Self::SubmitForReview, Role::Staff) | (Self::SetStatus(_), Role::Admin) => true,
            (Self::SubmitForReview, Role::Admin) | (Self::SetStatus(_), Role::Staff) => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmitForReview => f.write_str("submit for review"),
            Self::SetStatus(status) => write!(f, "set {status}"),
        }
    }
}

/// Actions offered to `role` for a document currently in `status`.
#[must_use]
pub fn legal_actions(role: Role, status: Status) -> LegalActions {
    match role {
        Role::Staff if STAFF_REVIEWABLE.contains(&status) => smallvec![Action::SubmitForReview],
        Role::Staff => LegalActions::new(),
        Role::Admin => Status::ALL.into_iter().map(Action::SetStatus).collect(),
    }
}
