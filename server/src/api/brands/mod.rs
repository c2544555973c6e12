//! Brand API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

/// Brand router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/brands", routes())
}

fn routes() -> Router<AppState> {
    Router::new().route("/", get(handler::list).post(handler::create))
}
