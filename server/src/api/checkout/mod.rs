//! Checkout API Module
//!
//! Delegates to the payment gateway. The gateway call is the authority;
//! the local payment record tracks its lifecycle.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Checkout router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::initialize))
        .route("/verify/{reference}", get(handler::verify))
        .route("/virtual-account", post(handler::create_virtual_account))
}
