//! Order API Module
//!
//! Listing is role-scoped (customers only see their own orders), status
//! edits need a back-office role, soft delete is admin only.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Order router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/deleted", get(handler::list_deleted))
        .route(
            "/{order_number}",
            get(handler::get_by_number)
                .patch(handler::update)
                .delete(handler::soft_delete),
        )
        .route("/{order_number}/print", post(handler::record_print))
}
