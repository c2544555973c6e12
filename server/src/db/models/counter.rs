//! Counter Model
//!
//! Atomic sequence documents. Order-number allocation increments these via
//! `find_one_and_update`, which serializes assignment under concurrency.

use serde::{Deserialize, Serialize};

/// Named sequence document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub value: i64,
}

/// Counter id backing order-number allocation
pub const ORDER_NUMBER_COUNTER: &str = "order_number";
