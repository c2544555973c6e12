//! Auth API Module
//!
//! Signup, login (password and social), session introspection, and the
//! single-use token flows (email verification, password reset).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Auth router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/social", post(handler::social_login))
        .route("/logout", post(handler::logout))
        .route("/verify-email", post(handler::verify_email))
        .route("/forgot-password", post(handler::forgot_password))
        .route("/reset-password", post(handler::reset_password))
        .route("/me", get(handler::me))
}
