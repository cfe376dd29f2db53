//! Depot helper extensions.

use std::any::Any;

use prd_tracker_app::{domain::users::UserRef, errors::ErrorKind};
use salvo::prelude::Depot;

use crate::errors::ApiError;

/// Helpers for depot values shared between middleware and handlers.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: UserRef);

    fn identity_or_401(&self) -> Result<&UserRef, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_identity(&mut self, identity: UserRef) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<&UserRef, ApiError> {
        self.obtain::<UserRef>()
            .map_err(|_ignored| ApiError::new(ErrorKind::Unauthenticated, "missing bearer token"))
    }
}
