//! Transition checks

use std::fmt;

use jiff::Timestamp;

use crate::domain::{
    documents::{DocumentCode, HistoryEntry, Status},
    users::{Role, UserRef},
    workflow::{Action, WorkflowError, legal_actions},
};

/// Non-blank, trimmed audit comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment(String);

impl Comment {
    /// # Errors
    ///
    /// Returns [`WorkflowError::MissingComment`] when the comment is blank.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(WorkflowError::MissingComment);
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A status change as requested by an operator, before any checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub code: DocumentCode,
    pub target: Status,
    pub comment: String,
}

/// A status change that passed every workflow check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedTransition {
    pub code: DocumentCode,
    pub action: Action,
    pub comment: Comment,
}

impl AuthorizedTransition {
    #[must_use]
    pub const fn target(&self) -> Status {
        self.action.target()
    }

    /// Audit entry recorded for this transition when performed by `actor`.
    #[must_use]
    pub fn history_entry(&self, actor: &UserRef, at: Timestamp) -> HistoryEntry {
        HistoryEntry {
            timestamp: at,
            user: actor.name.clone(),
            activity: self.target().to_string(),
            details: self.comment.to_string(),
            comment: Some(self.comment.to_string()),
        }
    }
}

/// Role check alone: whether `role` may request `target` at all.
///
/// # Errors
///
/// Returns [`WorkflowError::Forbidden`] for any staff target other than
/// `Need Review`.
pub fn permit(role: Role, target: Status) -> Result<Action, WorkflowError> {
    let action = Action::for_target(role, target);

    if !action.permitted_for(role) {
        return Err(WorkflowError::Forbidden { role, action });
    }

    Ok(action)
}

/// Run the full check sequence: role, then precondition, then comment.
///
/// `current` is the document's present status when it is known; admins have
/// no precondition so callers may pass `None` for them.
///
/// # Errors
///
/// Returns a [`WorkflowError`] for the first check that fails.
pub fn authorize(
    role: Role,
    current: Option<Status>,
    request: TransitionRequest,
) -> Result<AuthorizedTransition, WorkflowError> {
    let action = permit(role, request.target)?;

    if let Some(from) = current
        && !legal_actions(role, from).contains(&action)
    {
        return Err(WorkflowError::IllegalTransition {
            role,
            from,
            to: request.target,
        });
    }

    let comment = Comment::parse(&request.comment)?;

    Ok(AuthorizedTransition {
        code: request.code,
        action,
        comment,
    })
}
