//! User Admin Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::audit::AdminAction;
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{AccountStatus, PublicUser, Role};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, ok};

/// List all accounts, newest first
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<AppResponse<Vec<PublicUser>>>, AppError> {
    let users = UserRepository::new(state.database()).find_all().await?;
    Ok(ok(users.iter().map(|u| u.to_public()).collect()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Change an account's role (admin-logged)
pub async fn update_role(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<AppResponse<PublicUser>>, AppError> {
    let object_id = ObjectId::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("Invalid user id: {id}")))?;

    let repo = UserRepository::new(state.database());
    let before = repo
        .find_by_id(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    let updated = repo.update_role(object_id, req.role).await?;

    state
        .admin_log
        .log(
            AdminAction::RoleChanged,
            "user",
            id.clone(),
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({
                "email": updated.email,
                "from": before.role.to_string(),
                "to": updated.role.to_string(),
            }),
        )
        .await;

    tracing::info!(
        user = %updated.email,
        from = %before.role,
        to = %updated.role,
        "Role changed"
    );

    Ok(ok(updated.to_public()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AccountStatus,
}

/// Activate or deactivate an account.
///
/// Deactivation takes effect on the target's next request, since privileged
/// routes re-check the live record.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<AppResponse<PublicUser>>, AppError> {
    let object_id = ObjectId::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("Invalid user id: {id}")))?;

    let repo = UserRepository::new(state.database());
    repo.find_by_id(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    repo.set_status(object_id, req.status).await?;
    let updated = repo
        .find_by_id(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    state
        .admin_log
        .log(
            AdminAction::StatusChanged,
            "user",
            id,
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({ "email": updated.email, "status": updated.status }),
        )
        .await;

    Ok(ok(updated.to_public()))
}
