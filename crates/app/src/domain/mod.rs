//! PRD Tracker Domain Concerns

pub mod documents;
pub mod users;
pub mod workflow;
