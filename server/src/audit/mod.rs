//! Admin log module
//!
//! Append-only audit trail of privileged mutations with hash-chain
//! integrity. Entries are created, never mutated or deleted.

pub mod service;
pub mod types;

pub use service::AdminLogService;
pub use types::{AdminAction, AdminLogEntry, AdminLogListResponse, AdminLogQuery};
