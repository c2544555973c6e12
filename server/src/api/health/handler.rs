//! Health Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
}

/// Liveness probe. Deliberately does not touch the database.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        environment: state.config.environment.clone(),
    })
}
