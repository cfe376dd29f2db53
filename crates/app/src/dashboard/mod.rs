//! Operator dashboard
//!
//! Explicit client-side application state: the persisted session, the
//! registry mirror, and the guards that keep late responses from leaking
//! into a newer session.

mod api;
mod errors;
mod session_store;
mod state;

pub use api::*;
pub use errors::*;
pub use session_store::*;
pub use state::*;
