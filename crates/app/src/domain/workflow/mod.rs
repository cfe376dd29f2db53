//! Status workflow
//!
//! Role-gated transitions between document statuses. Every accepted
//! transition carries a mandatory comment that becomes the audit entry.

mod actions;
mod engine;
mod errors;

pub use actions::*;
pub use engine::*;
pub use errors::*;
