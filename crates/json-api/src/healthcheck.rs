//! Gateway Healthcheck Handler

use salvo::prelude::*;
use serde::{Deserialize, Serialize};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Liveness only; the backend is not contacted.
#[handler]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
