//! Repository Module
//!
//! Provides typed CRUD operations over MongoDB collections.

// Accounts
pub mod user;

// Catalog
pub mod brand;
pub mod product;

// Orders
pub mod deleted_order;
pub mod order;

// Payments
pub mod payment;

// Re-exports
pub use brand::BrandRepository;
pub use deleted_order::DeletedOrderRepository;
pub use order::{OrderFilter, OrderRepository};
pub use payment::PaymentRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

// =============================================================================
// Collection names
// =============================================================================

pub const USERS: &str = "users";
pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";
pub const DELETED_ORDERS: &str = "deleted_orders";
pub const BRANDS: &str = "brands";
pub const PAYMENTS: &str = "payments";
pub const COUNTERS: &str = "counters";
pub const ADMIN_LOGS: &str = "admin_logs";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Whether a driver error is a unique-index violation (E11000)
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        ErrorKind::Command(ce) => ce.code == 11000,
        _ => false,
    }
}

impl From<mongodb::error::Error> for RepoError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            RepoError::Duplicate(err.to_string())
        } else {
            RepoError::Database(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for RepoError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RepoError::Database(format!("BSON serialization failed: {err}"))
    }
}

impl From<mongodb::bson::oid::Error> for RepoError {
    fn from(err: mongodb::bson::oid::Error) -> Self {
        RepoError::Validation(format!("Invalid object id: {err}"))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
