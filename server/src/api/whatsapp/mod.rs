//! WhatsApp API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::AppState;

/// WhatsApp router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/whatsapp/send-price", post(handler::send_price))
}
