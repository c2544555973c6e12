//! Admin log type definitions
//!
//! Core data structures of the privileged-mutation audit trail. Entries
//! are immutable and never deleted; a SHA-256 hash chain links them.

use mongodb::bson;
use serde::{Deserialize, Serialize};

/// Audited action types (enum, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    // ═══ Authentication ═══
    LoginSuccess,
    LoginFailed,

    // ═══ Accounts ═══
    RoleChanged,
    StatusChanged,

    // ═══ Orders (financially relevant) ═══
    OrderCreated,
    OrderEdited,
    OrderPrinted,
    OrderDeleted,

    // ═══ Catalog ═══
    ProductCreated,
    ProductDeleted,
    StockAdjusted,
    BrandCreated,
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Immutable admin log entry
///
/// - `prev_hash`: hash of the previous entry
/// - `curr_hash`: SHA-256 over prev_hash + all fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLogEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    /// Monotonic sequence number
    pub seq: i64,
    pub at: bson::DateTime,
    pub action: AdminAction,
    /// Target type ("order", "user", "product", ...)
    pub target_type: String,
    /// Target id ("DM-145002", a hex ObjectId, ...)
    pub target_id: String,
    /// None for system events
    pub actor_id: Option<String>,
    pub actor_name: Option<String>,
    /// Structured detail payload
    pub details: serde_json::Value,
    pub prev_hash: String,
    pub curr_hash: String,
}

/// Admin log query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLogQuery {
    /// Start of range (Unix millis, inclusive)
    pub from: Option<i64>,
    /// End of range (Unix millis, inclusive)
    pub to: Option<i64>,
    pub action: Option<AdminAction>,
    pub actor_id: Option<String>,
    pub target_type: Option<String>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Admin log list response
#[derive(Debug, Serialize)]
pub struct AdminLogListResponse {
    pub items: Vec<AdminLogEntry>,
    pub total: u64,
}

/// Chain verification result
#[derive(Debug, Serialize)]
pub struct ChainVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<ChainBreak>,
}

/// A broken link in the chain
#[derive(Debug, Serialize)]
pub struct ChainBreak {
    pub seq: i64,
    pub expected_hash: String,
    pub actual_hash: String,
}
