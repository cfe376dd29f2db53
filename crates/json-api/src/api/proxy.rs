//! Proxy Handlers
//!
//! `GET` relays the document rows; `POST` dispatches an action-tagged request
//! under the identity the bearer middleware verified.

use std::sync::Arc;

use prd_tracker_app::{
    domain::{documents::Document, users::UserRef},
    errors::ErrorKind,
    gateway::GatewayRequest,
};
use salvo::prelude::*;
use serde_json::Value;
use tracing::{Span, debug, field::Empty, instrument};

use crate::{errors::ApiError, extensions::*, state::State};

/// All document rows, as the backend lists them.
#[handler]
pub(crate) async fn list(depot: &mut Depot) -> Result<Json<Vec<Document>>, ApiError> {
    let identity = depot.identity_or_401()?;

    let documents = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .gateway
        .list_documents(identity)
        .await?;

    debug!(count = documents.len(), "proxy.listed");

    Ok(Json(documents))
}

/// Forward an `add`, `updateStatus` or `getHistory` request.
#[handler]
pub(crate) async fn dispatch(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, ApiError> {
    let body = req
        .payload()
        .await
        .map_err(|error| ApiError::new(ErrorKind::Validation, error.to_string()))?;

    let request = GatewayRequest::from_json(body)?;

    let identity = depot.identity_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    forward(state, identity, request).await
}

#[instrument(
    name = "proxy.forward",
    skip_all,
    fields(user = Empty, role = Empty, action = Empty)
)]
async fn forward(
    state: &State,
    identity: &UserRef,
    request: GatewayRequest,
) -> Result<Json<Value>, ApiError> {
    let span = Span::current();

    span.record("user", identity.name.as_str());
    span.record("role", identity.role.as_str());
    span.record("action", request.action());

    let reply = state.app.gateway.dispatch(identity, request).await?;

    reply.to_json().or_500("failed to encode gateway reply").map(Json)
}
