//! Request ID generation and response header helpers.

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(request_id, "could not encode request id for response header: {source}");
        }
    }
}
