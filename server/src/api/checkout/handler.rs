//! Checkout Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{Payment, PaymentState, VirtualAccount};
use crate::db::repository::{PaymentRepository, UserRepository};
use crate::services::InitializedTransaction;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok};

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(range(min = 0.01, message = "must be positive"))]
    pub amount: f64,
    /// Order this payment settles, when known
    pub order_number: Option<String>,
}

/// Start a gateway checkout for the current user.
///
/// Records a pending payment, then asks the gateway for an authorization
/// URL. No retry on gateway failure.
pub async fn initialize(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<AppResponse<InitializedTransaction>>, AppError> {
    validate_payload(&req)?;

    let reference = Uuid::new_v4().simple().to_string();
    let now = bson::DateTime::now();
    PaymentRepository::new(state.database())
        .create(Payment {
            id: None,
            reference: reference.clone(),
            order_number: req.order_number,
            email: actor.email.clone(),
            amount: req.amount,
            channel: None,
            status: PaymentState::Pending,
            raw: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    // Gateway charges in the minor unit
    let amount_kobo = (req.amount * 100.0).round() as i64;
    let initialized = state
        .paystack
        .initialize_transaction(&actor.email, amount_kobo, &reference)
        .await?;

    tracing::info!(reference = %reference, amount = req.amount, "Checkout initialized");

    Ok(ok(initialized))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub reference: String,
    pub status: PaymentState,
}

/// Reconcile a payment against the gateway's view of the transaction.
pub async fn verify(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<AppResponse<VerifyResponse>>, AppError> {
    let repo = PaymentRepository::new(state.database());
    repo.find_by_reference(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {reference} not found")))?;

    let data = state.paystack.verify_transaction(&reference).await?;
    let status = match data.get("status").and_then(|s| s.as_str()) {
        Some("success") => PaymentState::Success,
        Some("failed") => PaymentState::Failed,
        _ => PaymentState::Pending,
    };

    let payment = repo.update_status(&reference, status, Some(&data)).await?;

    Ok(ok(VerifyResponse {
        reference: payment.reference,
        status: payment.status,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VirtualAccountRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub customer_code: String,
    #[serde(default = "default_bank")]
    pub preferred_bank: String,
}

fn default_bank() -> String {
    "wema-bank".to_string()
}

/// Create a dedicated virtual account and attach it to the user.
pub async fn create_virtual_account(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<VirtualAccountRequest>,
) -> Result<Json<AppResponse<VirtualAccount>>, AppError> {
    validate_payload(&req)?;

    let account = state
        .paystack
        .create_virtual_account(&req.customer_code, &req.preferred_bank)
        .await?;

    let virtual_account = VirtualAccount {
        bank_name: account.bank.name,
        account_number: account.account_number,
        account_name: account.account_name,
        provider_ref: account.id.to_string(),
    };

    let user_id = ObjectId::parse_str(&actor.id).map_err(|_| AppError::InvalidToken)?;
    UserRepository::new(state.database())
        .set_virtual_account(user_id, &virtual_account)
        .await?;

    tracing::info!(email = %actor.email, "Virtual account attached");

    Ok(ok(virtual_account))
}
