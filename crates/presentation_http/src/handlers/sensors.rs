//! Sensor state handlers

use std::sync::Arc;

use application::{Installation, SensorState};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::{error::ApiError, state::AppState};

fn installation(state: &AppState) -> Result<Arc<Installation>, ApiError> {
    state
        .host
        .current()
        .ok_or_else(|| ApiError::ServiceUnavailable("Integration is not set up".to_string()))
}

/// States of every sensor
pub async fn list_sensors(State(state): State<AppState>) -> Result<Json<Vec<SensorState>>, ApiError> {
    Ok(Json(installation(&state)?.states(Utc::now())))
}

/// State of one sensor, by key
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SensorState>, ApiError> {
    installation(&state)?
        .state_of(&key, Utc::now())
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown sensor: {key}")))
}
