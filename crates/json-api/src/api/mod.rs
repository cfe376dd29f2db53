//! Gateway API handlers

pub(crate) mod auth;
pub(crate) mod proxy;
