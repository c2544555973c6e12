//! Don Maris Accessories - storefront and back-office server
//!
//! # Architecture
//!
//! - **Database** (`db`): shared MongoDB connection, typed models and
//!   repositories
//! - **Auth** (`auth`): JWT + Argon2, http-only session cookie, live-role
//!   authorization
//! - **Orders** (`orders`): sequential order numbers, deferred-payment
//!   ledger, print/edit history, soft delete
//! - **Admin log** (`audit`): append-only audit trail with hash chain
//! - **Providers** (`services`): mail, payment gateway, messaging clients
//! - **HTTP API** (`api`): per-resource routers and handlers
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, session cookie, middleware
//! ├── audit/         # admin log
//! ├── orders/        # order lifecycle
//! ├── services/      # external provider clients
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # connection, models, repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{AppState, Config, Server};
pub use orders::OrderService;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepare the process environment: dotenv, then logging.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(std::env::var("RUST_LOG").ok().as_deref(), log_dir.as_deref());
}
