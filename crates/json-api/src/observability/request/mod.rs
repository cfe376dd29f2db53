//! Request-level logging, request IDs and HTTP metrics.

mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let route = spans::route_label(req.uri().path());
    let remote_addr = req.remote_addr().to_string();
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %request_id,
        method = %method,
        route,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    metrics::observe_request(&method, route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status.as_u16(), method = %method, route, "server error response");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), method = %method, route, "client error response");
        }

        if duration_ms > threshold_ms {
            warn!(method = %method, route, duration_ms, threshold_ms, "slow request detected");
        }
    });
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn ok(res: &mut Response) {
        res.render("ok");
    }

    fn service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("healthcheck").get(ok)),
        )
    }

    #[tokio::test]
    async fn request_id_is_echoed() -> TestResult {
        let mut res = TestClient::get("http://example.com/healthcheck")
            .add_header("x-request-id", "req-7", true)
            .send(&service())
            .await;

        assert_eq!(
            res.headers().get("x-request-id").and_then(|value| value.to_str().ok()),
            Some("req-7"),
            "caller id echoed"
        );
        assert_eq!(res.take_string().await?, "ok", "request reached handler");

        Ok(())
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service())
            .await;

        assert!(
            res.headers().get("x-request-id").is_some(),
            "generated id returned"
        );
    }
}
