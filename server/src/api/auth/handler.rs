//! Authentication Handlers
//!
//! Credential verification, token issuance, and the single-use token
//! flows. The session token travels as an http-only cookie; the body also
//! carries it for non-browser clients.

use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::audit::AdminAction;
use crate::auth::{CurrentUser, session};
use crate::core::AppState;
use crate::db::models::{AccountStatus, PublicUser, Role, User};
use crate::db::repository::UserRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok, ok_with_message};

/// Verification tokens live for 24 hours
const VERIFY_TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;
/// Reset tokens live for 1 hour
const RESET_TOKEN_TTL_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SocialLoginRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub token: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Signup handler
///
/// Creates an unverified customer account and dispatches the verification
/// email best-effort.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AppResponse<PublicUser>>, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let verify_token = Uuid::new_v4().to_string();
    let now = bson::DateTime::now();
    let user = repo
        .create(User {
            id: None,
            name: req.name,
            email: req.email,
            password_hash: Some(password_hash),
            role: Role::Customer,
            status: AccountStatus::Active,
            is_verified: false,
            verify_token: Some(verify_token.clone()),
            verify_token_expires_at: Some(bson::DateTime::from_millis(
                now.timestamp_millis() + VERIFY_TOKEN_TTL_MS,
            )),
            reset_token: None,
            reset_token_expires_at: None,
            ledger_balance: 0.0,
            lifetime_value: 0.0,
            avatar: None,
            virtual_account: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    dispatch_verification(&state, &user.email, &verify_token);

    tracing::info!(email = %user.email, "User signed up");

    Ok(ok_with_message(
        user.to_public(),
        "Check your inbox to verify your email address",
    ))
}

/// Login handler
///
/// NotFound when no user matches, InvalidCredential on a hash mismatch,
/// Unverified before email verification. On success the session token is
/// set as an http-only cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    let Some(user) = repo.find_by_email(&req.email).await? else {
        state
            .admin_log
            .log(
                AdminAction::LoginFailed,
                "auth",
                req.email.clone(),
                None,
                None,
                serde_json::json!({"reason": "user_not_found"}),
            )
            .await;
        tracing::warn!(email = %req.email, "Login failed - user not found");
        return Err(AppError::NotFound(format!("No account for {}", req.email)));
    };

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        state
            .admin_log
            .log(
                AdminAction::LoginFailed,
                "auth",
                user.email.clone(),
                None,
                None,
                serde_json::json!({"reason": "invalid_credentials"}),
            )
            .await;
        tracing::warn!(email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::InvalidCredential);
    }

    if !user.is_verified {
        return Err(AppError::Unverified);
    }

    issue_session(&state, &user).await
}

/// Social login handler
///
/// Upserts by email; social accounts are pre-verified. Inactive accounts
/// are rejected.
pub async fn social_login(
    State(state): State<AppState>,
    Json(req): Json<SocialLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    let user = match repo.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            let now = bson::DateTime::now();
            repo.create(User {
                id: None,
                name: req.name,
                email: req.email,
                password_hash: None,
                role: Role::Customer,
                status: AccountStatus::Active,
                is_verified: true,
                verify_token: None,
                verify_token_expires_at: None,
                reset_token: None,
                reset_token_expires_at: None,
                ledger_balance: 0.0,
                lifetime_value: 0.0,
                avatar: req.avatar,
                virtual_account: None,
                created_at: now,
                updated_at: now,
            })
            .await?
        }
    };

    if user.status == AccountStatus::Inactive {
        return Err(AppError::Forbidden("Account has been disabled".to_string()));
    }

    issue_session(&state, &user).await
}

/// Build the token + cookie pair for an authenticated user.
async fn issue_session(state: &AppState, user: &User) -> Result<impl IntoResponse + use<>, AppError> {
    let user_id = user.id.map(|i| i.to_hex()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.name, &user.email, user.role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    state
        .admin_log
        .log(
            AdminAction::LoginSuccess,
            "auth",
            user.email.clone(),
            Some(user_id),
            Some(user.name.clone()),
            serde_json::json!({"role": user.role.to_string()}),
        )
        .await;

    tracing::info!(email = %user.email, role = %user.role, "User logged in");

    let cookie = session::build_session_cookie(
        &token,
        state.jwt_service.config.expiration_minutes,
        state.config.is_production(),
    );
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        ok(LoginResponse {
            token,
            user: user.to_public(),
        }),
    ))
}

/// Logout handler: clears the session cookie.
pub async fn logout(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    tracing::info!(email = %user.email, "User logged out");
    (
        AppendHeaders([(header::SET_COOKIE, session::clear_session_cookie())]),
        ok(()),
    )
}

/// Current session introspection, always the live user record.
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AppResponse<PublicUser>>, AppError> {
    let id = ObjectId::parse_str(&user.id).map_err(|_| AppError::InvalidToken)?;
    let live = UserRepository::new(state.database())
        .find_by_id(id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ok(live.to_public()))
}

/// Email verification: consumes the single-use token.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<AppResponse<()>>, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    let user = repo
        .find_by_verify_token(&req.token)
        .await?
        .ok_or(AppError::InvalidOneTimeToken)?;

    if token_expired(user.verify_token_expires_at) {
        return Err(AppError::InvalidOneTimeToken);
    }

    let id = user.id.ok_or(AppError::InvalidOneTimeToken)?;
    repo.mark_verified(id).await?;

    tracing::info!(email = %user.email, "Email verified");
    Ok(ok_with_message((), "Email verified, you can now log in"))
}

/// Password reset request.
///
/// Responds identically whether or not the email exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<AppResponse<()>>, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    if let Some(user) = repo.find_by_email(&req.email).await?
        && let Some(id) = user.id
    {
        let token = Uuid::new_v4().to_string();
        let expires_at =
            bson::DateTime::from_millis(bson::DateTime::now().timestamp_millis() + RESET_TOKEN_TTL_MS);
        repo.set_reset_token(id, &token, expires_at).await?;

        let mailer = state.mailer.clone();
        let email = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&email, &token).await {
                tracing::warn!(email = %email, error = %e, "Password reset dispatch failed");
            }
        });
    }

    Ok(ok_with_message(
        (),
        "If that address exists, a reset token is on its way",
    ))
}

/// Password reset: consumes the single-use token.
///
/// An absent or expired token changes nothing; the password field is only
/// touched on success.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<AppResponse<()>>, AppError> {
    validate_payload(&req)?;

    let repo = UserRepository::new(state.database());
    let user = repo
        .find_by_reset_token(&req.token)
        .await?
        .ok_or(AppError::InvalidOneTimeToken)?;

    if token_expired(user.reset_token_expires_at) {
        return Err(AppError::InvalidOneTimeToken);
    }

    let id = user.id.ok_or(AppError::InvalidOneTimeToken)?;
    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
    repo.update_password_and_clear_reset(id, &password_hash)
        .await?;

    tracing::info!(email = %user.email, "Password reset");
    Ok(ok_with_message((), "Password updated, you can now log in"))
}

fn token_expired(expires_at: Option<bson::DateTime>) -> bool {
    match expires_at {
        Some(at) => at.timestamp_millis() < bson::DateTime::now().timestamp_millis(),
        None => true,
    }
}

/// Fire-and-forget verification email.
fn dispatch_verification(state: &AppState, email: &str, token: &str) {
    let mailer = state.mailer.clone();
    let email = email.to_string();
    let token = token.to_string();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification_email(&email, &token).await {
            tracing::warn!(email = %email, error = %e, "Verification email dispatch failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry() {
        let now = bson::DateTime::now().timestamp_millis();
        assert!(!token_expired(Some(bson::DateTime::from_millis(now + 60_000))));
        assert!(token_expired(Some(bson::DateTime::from_millis(now - 60_000))));
        assert!(token_expired(None));
    }

    #[test]
    fn test_signup_payload_validation() {
        let bad = SignupRequest {
            name: "".into(),
            email: "nope".into(),
            password: "short".into(),
        };
        assert!(validate_payload(&bad).is_err());

        let good = SignupRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "long-enough-secret".into(),
        };
        assert!(validate_payload(&good).is_ok());
    }
}
