//! Payment Model
//!
//! One record per gateway transaction reference.

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Gateway transaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    Pending,
    Success,
    Failed,
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Gateway reference, unique
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub email: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub status: PaymentState,
    /// Raw gateway payload, kept for reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}
