//! Login Handler

use std::sync::Arc;

use prd_tracker_app::{
    auth::Credentials,
    errors::ErrorKind,
    wire::{Envelope, LoginReply},
};
use salvo::prelude::*;
use tracing::info;

use crate::{errors::ApiError, extensions::*, state::State};

/// Exchange credentials for a signed session token.
#[handler]
pub(crate) async fn login(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<Envelope<LoginReply>>, ApiError> {
    let body = req
        .payload()
        .await
        .map_err(|error| ApiError::new(ErrorKind::Validation, error.to_string()))?;

    let credentials: Credentials = serde_json::from_slice(body)
        .map_err(|error| ApiError::new(ErrorKind::Validation, format!("invalid login request: {error}")))?;

    let issued = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .session
        .login(&credentials)
        .await?;

    info!(user = %issued.identity.name, role = %issued.identity.role, "session.issued");

    Ok(Json(Envelope::Success(LoginReply {
        user: issued.identity.name,
        role: issued.identity.role,
        token: issued.token,
    })))
}
