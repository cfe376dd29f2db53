//! Prometheus HTTP metrics and the `/metrics` endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 12] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

#[derive(Debug)]
struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
}

static HTTP_METRICS: OnceLock<Option<HttpMetrics>> = OnceLock::new();

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    }

    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static HttpMetrics> {
    HTTP_METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("failed to build http metrics: {source}"))
                .ok()
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> prometheus::Result<HttpMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "prd_gateway_http_requests_total",
                "HTTP requests handled by the gateway, by method, route and status code.",
            ),
            &["method", "route", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "prd_gateway_http_request_duration_seconds",
                "HTTP request duration in seconds, by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "prd_gateway_http_requests_in_flight",
            "HTTP requests currently being handled.",
        ))?,
    )?;

    Ok(HttpMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
    })
}
