//! App Router

use salvo::Router;

use crate::{api, auth, healthcheck, observability};

/// Public and session-protected gateway routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("api/auth").post(api::auth::login))
        .push(
            Router::with_path("api/proxy")
                .hoop(auth::middleware::handler)
                .get(api::proxy::list)
                .post(api::proxy::dispatch),
        )
}
