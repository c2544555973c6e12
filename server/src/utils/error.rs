//! Unified Error Handling
//!
//! Provides application-wide error types and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E1xxx  | authentication | E1001 login required |
//! | E2xxx  | authorization | E2001 role mismatch |
//! | E0xxx  | request / business | E0003 not found |
//! | E9xxx  | system / upstream | E9002 database error |
//!
//! # Usage
//!
//! ```ignore
//! // Return an error
//! Err(AppError::NotFound("Order DM-145000 not found".into()))
//!
//! // Return a success payload
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredential,

    // ========== Authorization Errors (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Account not verified")]
    Unverified,

    // ========== Business Logic Errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid or expired token")]
    InvalidOneTimeToken,

    // ========== System Errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E1001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E1003", "Token expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E1002", "Invalid token"),
            AppError::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "E1004", "Invalid email or password")
            }

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),
            AppError::Unverified => (
                StatusCode::FORBIDDEN,
                "E2002",
                "Please verify your email address first",
            ),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::InvalidOneTimeToken => {
                (StatusCode::BAD_REQUEST, "E0007", "Invalid or expired token")
            }

            // Database errors (500) - generic message outward, detail stays in the log
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Upstream provider errors (502)
            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "Upstream provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "E9003",
                    "Upstream provider unavailable",
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result alias for handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let e: AppError = RepoError::NotFound("Order DM-145000 not found".into()).into();
        assert!(matches!(e, AppError::NotFound(_)));

        let e: AppError = RepoError::Duplicate("email taken".into()).into();
        assert!(matches!(e, AppError::Conflict(_)));
    }

    #[test]
    fn test_status_codes() {
        let resp = AppError::InvalidCredential.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AppError::Unverified.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::InvalidOneTimeToken.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Upstream("paystack 500".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
