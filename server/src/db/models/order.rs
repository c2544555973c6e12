//! Order Model

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    #[serde(rename = "Not Paid")]
    NotPaid,
    Incomplete,
    /// Deferred payment: the order amount lands on the customer ledger
    Pending,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::NotPaid => "Not Paid",
            PaymentStatus::Incomplete => "Incomplete",
            PaymentStatus::Pending => "Pending",
        };
        write!(f, "{s}")
    }
}

/// Fulfilment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Fulfilled,
    Processing,
    Pending,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Denormalized customer display fields, frozen at checkout time.
///
/// May drift from the live user record; nothing synchronizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ObjectId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Print event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintEntry {
    pub printed_by: String,
    pub at: bson::DateTime,
}

/// Field-level edit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditEntry {
    pub edited_by: String,
    pub field: String,
    pub from: String,
    pub to: String,
    pub at: bson::DateTime,
}

/// Order entity
///
/// `order_number` is assigned by the service, never by the client, and is
/// covered by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub order_number: String,
    pub customer: CustomerSnapshot,
    pub items: Vec<LineItem>,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    #[serde(default)]
    pub print_history: Vec<PrintEntry>,
    #[serde(default)]
    pub edit_history: Vec<EditEntry>,
    pub created_by: String,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Soft-deleted order, moved to the archival collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedOrder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub order: Order,
    pub deleted_by: String,
    pub deleted_at: bson::DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_wire_format() {
        // "Not Paid" carries a space on the wire
        let json = serde_json::to_string(&PaymentStatus::NotPaid).expect("serialize");
        assert_eq!(json, "\"Not Paid\"");
        let back: PaymentStatus = serde_json::from_str("\"Not Paid\"").expect("deserialize");
        assert_eq!(back, PaymentStatus::NotPaid);

        let json = serde_json::to_string(&PaymentStatus::Pending).expect("serialize");
        assert_eq!(json, "\"Pending\"");
    }
}
