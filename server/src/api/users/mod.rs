//! User admin API Module
//!
//! Account listing and role management. Admin only.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::require_role;
use crate::core::AppState;
use crate::db::models::Role;

/// User router (admin only)
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/users", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/role", patch(handler::update_role))
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_role(&[Role::Admin]),
        ))
}
