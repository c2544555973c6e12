//! Admin Log Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::types::{AdminLogListResponse, AdminLogQuery, ChainVerification};
use crate::core::AppState;
use crate::utils::{AppError, AppResponse, ok};

/// Query the audit trail, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminLogQuery>,
) -> Result<Json<AppResponse<AdminLogListResponse>>, AppError> {
    let (items, total) = state
        .admin_log
        .query(&query)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(ok(AdminLogListResponse { items, total }))
}

/// Verify hash-chain integrity over the whole trail
pub async fn verify_chain(
    State(state): State<AppState>,
) -> Result<Json<AppResponse<ChainVerification>>, AppError> {
    let verification = state
        .admin_log
        .verify_chain()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(ok(verification))
}
