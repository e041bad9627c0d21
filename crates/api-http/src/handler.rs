//! HTTP Handlers

use crate::error::ApiError;
use crate::types::{HealthResponse, TestRequest, TestResponse};
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::SecondsFormat;
use netprobe_core::port::TimeProvider;
use netprobe_core::DiagnosticService;
use std::sync::Arc;
use tracing::warn;

/// Shared handler state with injected dependencies
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DiagnosticService>,
    pub time_provider: Arc<dyn TimeProvider>,
}

impl AppState {
    pub fn new(service: Arc<DiagnosticService>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            service,
            time_provider,
        }
    }
}

/// POST /api/test
///
/// The body is decoded by hand so that any content type is accepted; only a
/// body that is not a JSON object of the right shape is rejected.
pub async fn run_test(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TestResponse>, ApiError> {
    let request: TestRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected undecodable diagnostic request");
        ApiError::InvalidBody(e)
    })?;

    let result = state.service.run(request.into()).await;
    Ok(Json(TestResponse::from(result)))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: state
            .time_provider
            .now()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
