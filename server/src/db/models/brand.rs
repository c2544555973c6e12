//! Brand Model

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Accessory brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}
