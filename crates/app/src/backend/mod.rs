//! Backend channel
//!
//! Client for the spreadsheet service: one URL, `GET` for the document list
//! and action-tagged `POST`s for everything else.

mod config;
mod errors;
mod http;
mod service;

pub use config::*;
pub use errors::*;
pub use http::{HttpBackend, decode_rows};
pub use service::*;
