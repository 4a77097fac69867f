//! Route definitions

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::{handlers, state::AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Sensor API
        .route("/api/sensors", get(handlers::sensors::list_sensors))
        .route("/api/sensors/{key}", get(handlers::sensors::get_sensor))
        .with_state(state)
}

/// Serve the www directory under `/local`, where the card resource points
pub fn with_static_files(router: Router, www_dir: &Path) -> Router {
    router.nest_service("/local", ServeDir::new(www_dir))
}
