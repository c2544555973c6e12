//! WhatsApp Handlers

use axum::{Json, extract::State};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::AppState;
use crate::db::repository::ProductRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok};

#[derive(Debug, Deserialize, Validate)]
pub struct SendPriceRequest {
    /// Destination number in international format
    #[validate(length(min = 7, max = 20, message = "must be a phone number"))]
    pub to: String,
    pub product_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendPriceResponse {
    pub message_id: String,
}

/// Send a product price quote over WhatsApp.
pub async fn send_price(
    State(state): State<AppState>,
    Json(req): Json<SendPriceRequest>,
) -> Result<Json<AppResponse<SendPriceResponse>>, AppError> {
    validate_payload(&req)?;

    let product_id = ObjectId::parse_str(&req.product_id)
        .map_err(|_| AppError::Validation(format!("Invalid product id: {}", req.product_id)))?;
    let product = ProductRepository::new(state.database())
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", req.product_id)))?;

    let message_id = state
        .whatsapp
        .send_price_quote(&req.to, &product.name, product.price)
        .await?;

    tracing::info!(to = %req.to, product = %product.name, "Price quote sent");

    Ok(ok(SendPriceResponse { message_id }))
}
