//! Authentication middleware
//!
//! Axum middleware for session authentication and role authorization.

use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use mongodb::bson::oid::ObjectId;

use crate::auth::{CurrentUser, JwtError, session};
use crate::core::AppState;
use crate::db::models::{AccountStatus, Role};
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::AppError;

/// Authentication middleware: requires a valid session.
///
/// Reads the session cookie (or a bearer token) and validates it. On
/// success the [`CurrentUser`] is injected into request extensions.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (they 404 on their own)
/// - public auth endpoints (login, signup, token flows)
/// - catalog reads (`GET /api/products`, `GET /api/brands`)
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight passes through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let Some(token) = session::extract_token(req.headers()) else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::Unauthorized);
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

fn is_public_route(method: &http::Method, path: &str) -> bool {
    const PUBLIC_AUTH: &[&str] = &[
        "/api/auth/login",
        "/api/auth/signup",
        "/api/auth/social",
        "/api/auth/verify-email",
        "/api/auth/forgot-password",
        "/api/auth/reset-password",
    ];

    if path == "/api/health" || PUBLIC_AUTH.contains(&path) {
        return true;
    }

    // Storefront catalog is world-readable
    method == http::Method::GET
        && (path == "/api/brands"
            || path == "/api/products"
            || path.starts_with("/api/products/"))
}

/// Role authorization middleware: requires one of the listed roles.
///
/// The role is re-checked against the **current** user record on every
/// call, never trusted from the token, so a demoted account loses its
/// privileges as soon as the next request arrives. Admins pass any check.
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/users", get(handler::list))
///     .layer(middleware::from_fn_with_state(state, require_role(&[Role::Admin])));
/// ```
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(
    State<AppState>,
    Request,
    Next,
) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |State(state): State<AppState>, req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or(AppError::Unauthorized)?;

            let live_role = live_role(&state, &user).await?;

            if live_role != Role::Admin && !allowed.contains(&live_role) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id.clone(),
                    live_role = live_role.to_string(),
                    required = format!("{:?}", allowed)
                );
                return Err(AppError::Forbidden(format!(
                    "Requires one of the roles: {}",
                    allowed
                        .iter()
                        .map(Role::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// In-handler role check for routes with mixed access levels.
///
/// Same live-role semantics as [`require_role`]: the database is the
/// source of truth, admins pass any check, inactive accounts fail.
pub async fn ensure_role(
    state: &AppState,
    user: &CurrentUser,
    allowed: &'static [Role],
) -> Result<(), AppError> {
    let live_role = live_role(state, user).await?;
    if live_role != Role::Admin && !allowed.contains(&live_role) {
        return Err(AppError::Forbidden(format!(
            "Requires one of the roles: {}",
            allowed
                .iter()
                .map(Role::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(())
}

/// Load the user's current role from the database.
///
/// Inactive accounts are rejected outright.
pub async fn live_role(state: &AppState, user: &CurrentUser) -> Result<Role, AppError> {
    let id = ObjectId::parse_str(&user.id).map_err(|_| AppError::InvalidToken)?;
    let live = UserRepository::new(state.database())
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::Unauthorized)?;

    if live.status == AccountStatus::Inactive {
        return Err(AppError::Forbidden("Account has been disabled".to_string()));
    }

    Ok(live.role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&http::Method::POST, "/api/auth/login"));
        assert!(is_public_route(&http::Method::POST, "/api/auth/reset-password"));
        assert!(is_public_route(&http::Method::GET, "/api/products"));
        assert!(is_public_route(&http::Method::GET, "/api/products/651f1a2b3c4d5e6f708192a3"));
        assert!(is_public_route(&http::Method::GET, "/api/brands"));
        assert!(is_public_route(&http::Method::GET, "/api/health"));

        assert!(!is_public_route(&http::Method::POST, "/api/products"));
        assert!(!is_public_route(&http::Method::GET, "/api/orders"));
        assert!(!is_public_route(&http::Method::GET, "/api/users"));
    }
}
