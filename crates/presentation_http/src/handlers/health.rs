//! Health check handlers

use application::CoordinatorStatus;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    pub coordinators: Vec<CoordinatorStatus>,
    pub card_registered: bool,
}

/// Readiness check - does every coordinator hold data?
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let installation = state.host.current();
    let ready = installation.as_ref().is_some_and(|i| i.is_ready());
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            entry_id: installation.as_ref().map(|i| i.entry().entry_id.clone()),
            coordinators: installation.map(|i| i.statuses()).unwrap_or_default(),
            card_registered: state.host.registration().is_registered(),
        }),
    )
}
