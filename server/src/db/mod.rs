//! Database Module
//!
//! Owns the shared MongoDB connection and index bootstrap.

pub mod models;
pub mod repository;

use mongodb::{
    Client, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tokio::sync::OnceCell;

use crate::core::config::DbConfig;
use crate::utils::AppError;

/// Database service, owner of the shared client and database handle
#[derive(Clone)]
pub struct DbService {
    client: Client,
    database: Database,
}

impl std::fmt::Debug for DbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbService")
            .field("database", &self.database.name())
            .finish_non_exhaustive()
    }
}

/// Process-wide connection cell. Concurrent first callers await the same
/// in-flight connect attempt instead of opening duplicate connections.
static CONNECTION: OnceCell<DbService> = OnceCell::const_new();

impl DbService {
    /// Shared connection accessor. Idempotent across repeated calls; the
    /// first caller pays connection latency and index bootstrap.
    pub async fn get_or_connect(config: &DbConfig) -> Result<&'static DbService, AppError> {
        CONNECTION
            .get_or_try_init(|| Self::connect(config))
            .await
    }

    async fn connect(config: &DbConfig) -> Result<Self, AppError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {e}")))?;
        let database = client.database(&config.database);

        ensure_indexes(&database).await?;

        tracing::info!(database = %config.database, "Document store connection established");

        Ok(Self { client, database })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

/// Create the unique indexes the write paths rely on.
///
/// Identifier uniqueness (order numbers, emails, payment references) is
/// enforced here, not by the allocation logic.
async fn ensure_indexes(db: &Database) -> Result<(), AppError> {
    let unique = |keys: Document, name: &str| {
        IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(name.to_string())
                    .build(),
            )
            .build()
    };

    db.collection::<models::User>(repository::USERS)
        .create_index(unique(doc! { "email": 1 }, "email_unique"))
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users index: {e}")))?;

    db.collection::<models::Order>(repository::ORDERS)
        .create_index(unique(doc! { "order_number": 1 }, "order_number_unique"))
        .await
        .map_err(|e| AppError::Database(format!("Failed to create orders index: {e}")))?;

    db.collection::<models::Brand>(repository::BRANDS)
        .create_index(unique(doc! { "name": 1 }, "name_unique"))
        .await
        .map_err(|e| AppError::Database(format!("Failed to create brands index: {e}")))?;

    db.collection::<models::Payment>(repository::PAYMENTS)
        .create_index(unique(doc! { "reference": 1 }, "reference_unique"))
        .await
        .map_err(|e| AppError::Database(format!("Failed to create payments index: {e}")))?;

    Ok(())
}
