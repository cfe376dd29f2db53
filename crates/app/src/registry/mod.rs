//! Document registry
//!
//! Client-side mirror of the backend's documents with a derived view
//! (search, sort, pagination). The mirror is a cache: optimistic updates are
//! applied locally and the next `load` replaces everything.

mod errors;
mod sort;
mod view;

pub use errors::*;
pub use sort::*;
pub use view::*;
