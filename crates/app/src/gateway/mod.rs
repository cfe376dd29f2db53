//! Authenticated gateway
//!
//! Decodes operator requests, attaches the verified identity and enforces
//! workflow rules before anything reaches the backend.

mod errors;
mod requests;
mod service;

pub use errors::*;
pub use requests::*;
pub use service::*;
