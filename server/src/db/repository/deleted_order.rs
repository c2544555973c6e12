//! Deleted Order Repository
//!
//! Archival collection for soft-deleted orders.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{DELETED_ORDERS, RepoResult};
use crate::db::models::DeletedOrder;

#[derive(Clone)]
pub struct DeletedOrderRepository {
    coll: Collection<DeletedOrder>,
}

impl DeletedOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<DeletedOrder>(DELETED_ORDERS),
        }
    }

    pub async fn archive(&self, mut deleted: DeletedOrder) -> RepoResult<DeletedOrder> {
        let result = self.coll.insert_one(&deleted).await?;
        deleted.id = result.inserted_id.as_object_id();
        Ok(deleted)
    }

    /// Archived orders, most recently deleted first
    pub async fn find_all(&self) -> RepoResult<Vec<DeletedOrder>> {
        let deleted = self
            .coll
            .find(doc! {})
            .sort(doc! { "deleted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(deleted)
    }
}
