//! Brand Handlers

use axum::{Extension, Json, extract::State};
use mongodb::bson;
use serde::Deserialize;
use validator::Validate;

use crate::audit::AdminAction;
use crate::auth::{CurrentUser, ensure_role};
use crate::core::AppState;
use crate::db::models::{Brand, Role};
use crate::db::repository::BrandRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok};

/// List brands alphabetically
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<AppResponse<Vec<Brand>>>, AppError> {
    let brands = BrandRepository::new(state.database()).find_all().await?;
    Ok(ok(brands))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrandRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub logo: Option<String>,
}

/// Add a brand (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<CreateBrandRequest>,
) -> Result<Json<AppResponse<Brand>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin]).await?;
    validate_payload(&req)?;

    let now = bson::DateTime::now();
    let brand = BrandRepository::new(state.database())
        .create(Brand {
            id: None,
            name: req.name,
            logo: req.logo,
            created_at: now,
            updated_at: now,
        })
        .await?;

    state
        .admin_log
        .log(
            AdminAction::BrandCreated,
            "brand",
            brand.id.map(|i| i.to_hex()).unwrap_or_default(),
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({ "name": brand.name }),
        )
        .await;

    Ok(ok(brand))
}
