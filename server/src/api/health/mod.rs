//! Health API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

/// Health router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(handler::health))
}
