//! Admin Log API Module
//!
//! Read-only access to the audit trail. Admin only.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::core::AppState;
use crate::db::models::Role;

/// Admin log router (admin only)
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/admin/logs", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/verify", get(handler::verify_chain))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_role(&[Role::Admin]),
        ))
}
