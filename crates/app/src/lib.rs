//! PRD tracker domain, gateway services and operator client.

pub mod auth;
pub mod backend;
pub mod context;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod presentation;
pub mod registry;
pub mod secret;
pub mod wire;

#[cfg(test)]
mod test;
