//! Product Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use validator::Validate;

use crate::audit::AdminAction;
use crate::auth::{CurrentUser, ensure_role};
use crate::core::AppState;
use crate::db::models::{Product, Review, Role};
use crate::db::repository::{ProductRepository, UserRepository};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok};

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::Validation(format!("Invalid product id: {id}")))
}

/// List the catalog, newest first
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<AppResponse<Vec<Product>>>, AppError> {
    let products = ProductRepository::new(state.database()).find_all().await?;
    Ok(ok(products))
}

/// Fetch one product
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<Product>>, AppError> {
    let object_id = parse_id(&id)?;
    let product = ProductRepository::new(state.database())
        .find_by_id(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;
    Ok(ok(product))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub brand: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    #[serde(default)]
    pub stock: i64,
    pub image: Option<String>,
}

/// Add a catalog entry (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<AppResponse<Product>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin]).await?;
    validate_payload(&req)?;

    let now = bson::DateTime::now();
    let product = ProductRepository::new(state.database())
        .create(Product {
            id: None,
            name: req.name,
            description: req.description,
            brand: req.brand,
            price: req.price,
            image: req.image,
            stock: req.stock,
            stock_history: Vec::new(),
            reviews: Vec::new(),
            rating: 0.0,
            created_at: now,
            updated_at: now,
        })
        .await?;

    state
        .admin_log
        .log(
            AdminAction::ProductCreated,
            "product",
            product.id.map(|i| i.to_hex()).unwrap_or_default(),
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({ "name": product.name, "price": product.price }),
        )
        .await;

    Ok(ok(product))
}

/// Remove a catalog entry (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<()>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin]).await?;
    let object_id = parse_id(&id)?;

    let removed = ProductRepository::new(state.database())
        .delete(object_id)
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("Product {id} not found")));
    }

    state
        .admin_log
        .log(
            AdminAction::ProductDeleted,
            "product",
            id,
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({}),
        )
        .await;

    Ok(ok(()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewRequest {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    #[serde(default)]
    pub comment: String,
}

/// Add a review; the stored rating becomes the mean of all review ratings.
pub async fn add_review(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<AddReviewRequest>,
) -> Result<Json<AppResponse<Product>>, AppError> {
    validate_payload(&req)?;
    let object_id = parse_id(&id)?;

    // Both the product and the reviewing account must still exist
    let author_id =
        ObjectId::parse_str(&actor.id).map_err(|_| AppError::InvalidToken)?;
    let author = UserRepository::new(state.database())
        .find_by_id(author_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", actor.id)))?;

    let review = Review {
        author_id,
        author_name: author.name,
        rating: req.rating,
        comment: req.comment,
        at: bson::DateTime::now(),
    };

    let product = ProductRepository::new(state.database())
        .add_review(object_id, &review)
        .await?;

    tracing::info!(
        product = %product.name,
        rating = req.rating,
        new_mean = product.rating,
        "Review added"
    );

    Ok(ok(product))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockRequest {
    /// Signed adjustment; negative removes stock
    pub delta: i64,
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub reason: String,
}

/// Adjust stock (admin or supplier), appending to the movement history.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<AppResponse<Product>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin, Role::Supplier]).await?;
    validate_payload(&req)?;
    if req.delta == 0 {
        return Err(AppError::Validation("delta must not be zero".into()));
    }
    let object_id = parse_id(&id)?;

    let product = ProductRepository::new(state.database())
        .adjust_stock(object_id, req.delta, &req.reason, &actor.email)
        .await?;

    state
        .admin_log
        .log(
            AdminAction::StockAdjusted,
            "product",
            id,
            Some(actor.id.clone()),
            Some(actor.name.clone()),
            serde_json::json!({
                "delta": req.delta,
                "level": product.stock,
                "reason": req.reason,
            }),
        )
        .await;

    Ok(ok(product))
}
