//! Tracked Documents

pub mod data;
pub mod errors;
pub mod history;
pub mod models;

pub use data::*;
pub use errors::*;
pub use history::*;
pub use models::*;
