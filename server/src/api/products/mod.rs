//! Product API Module
//!
//! Catalog reads are public; mutations check the caller's live role in
//! the handler (admin for catalog changes, admin/supplier for stock).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Product router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::remove))
        .route("/{id}/reviews", post(handler::add_review))
        .route("/{id}/stock", post(handler::adjust_stock))
}
