//! Server state
//!
//! [`AppState`] holds shared references to every service. Cloning is
//! shallow; the underlying handles are reference-counted.

use std::sync::Arc;

use mongodb::{Client, Database};

use crate::audit::AdminLogService;
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::services::{MailerService, PaystackService, WhatsappService};
use crate::utils::AppError;

/// Shared application state
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | environment-derived settings (immutable) |
/// | db | shared document-store connection |
/// | jwt_service | session token signing and validation |
/// | admin_log | append-only audit trail |
/// | mailer | transactional email (best-effort dispatch) |
/// | paystack | payment gateway client |
/// | whatsapp | messaging provider client |
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub admin_log: AdminLogService,
    pub mailer: Arc<MailerService>,
    pub paystack: PaystackService,
    pub whatsapp: WhatsappService,
}

impl AppState {
    /// Initialize all services.
    ///
    /// Connects to the document store (first caller of the shared
    /// connection), then runs the legacy order-number backfill before the
    /// server starts taking requests.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::get_or_connect(&config.db).await?.clone();

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let admin_log = AdminLogService::new(db.database());
        let mailer = Arc::new(
            MailerService::new(&config.mail)
                .map_err(|e| AppError::Internal(format!("Failed to build mailer: {e}")))?,
        );
        let paystack = PaystackService::new(config.paystack.clone());
        let whatsapp = WhatsappService::new(config.whatsapp.clone());

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            admin_log,
            mailer,
            paystack,
            whatsapp,
        };

        // One-time numbering of orders that predate number assignment
        state.order_service().backfill_order_numbers().await?;

        Ok(state)
    }

    /// Shared database handle
    pub fn database(&self) -> &Database {
        self.db.database()
    }

    /// Shared client handle (sessions/transactions)
    pub fn client(&self) -> &Client {
        self.db.client()
    }

    /// Order lifecycle service
    pub fn order_service(&self) -> OrderService {
        OrderService::new(&self.db, self.mailer.clone(), self.admin_log.clone())
    }
}
