//! Bearer session middleware.
//!
//! Verifies the session token and records the verified identity in the
//! depot. Handlers take the acting user from there and nowhere else.

use std::sync::Arc;

use prd_tracker_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*, writing::Scribe as _};
use tracing::debug;

use crate::{errors::ApiError, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        ApiError::from(AuthServiceError::Unauthenticated).render(res);
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            error.render(res);
            ctrl.skip_rest();

            return;
        }
    };

    let claims = match state.app.session.authenticate_bearer(token) {
        Ok(claims) => claims,
        Err(error) => {
            debug!(kind = error.kind().as_str(), "session.rejected");

            ApiError::from(error).render(res);
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_identity(claims.identity());

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
