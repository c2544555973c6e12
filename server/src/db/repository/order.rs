//! Order Repository

use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{ClientSession, Collection, Database};

use super::{ORDERS, RepoError, RepoResult, is_duplicate_key};
use crate::db::models::{EditEntry, Order, PrintEntry};

/// Optional listing filter: by creator or by customer identity
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub created_by: Option<String>,
    pub customer_email: Option<String>,
}

#[derive(Clone)]
pub struct OrderRepository {
    coll: Collection<Order>,
}

impl OrderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<Order>(ORDERS),
        }
    }

    /// Matching orders, date descending. No pagination, the whole set.
    pub async fn find_all(&self, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
        let mut query = doc! {};
        if let Some(creator) = &filter.created_by {
            query.insert("created_by", creator.as_str());
        }
        if let Some(email) = &filter.customer_email {
            query.insert("customer.email", email.as_str());
        }

        let orders = self
            .coll
            .find(query)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }

    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        Ok(self
            .coll
            .find_one(doc! { "order_number": order_number })
            .await?)
    }

    /// Most recently created order whose number matches the prefix pattern.
    ///
    /// Used to seed the allocation counter from pre-existing data.
    pub async fn find_latest_numbered(&self, pattern: &str) -> RepoResult<Option<Order>> {
        Ok(self
            .coll
            .find_one(doc! { "order_number": { "$regex": pattern } })
            .sort(doc! { "created_at": -1 })
            .await?)
    }

    /// Insert inside the caller's transaction. A concurrent allocation that
    /// somehow produced the same number dies here on the unique index.
    pub async fn insert_with_session(
        &self,
        session: &mut ClientSession,
        mut order: Order,
    ) -> RepoResult<Order> {
        let result = self
            .coll
            .insert_one(&order)
            .session(&mut *session)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    RepoError::Duplicate(format!(
                        "Order number '{}' already exists",
                        order.order_number
                    ))
                } else {
                    e.into()
                }
            })?;
        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    /// Append a print event; false when no order matches.
    pub async fn push_print(&self, order_number: &str, entry: &PrintEntry) -> RepoResult<bool> {
        let result = self
            .coll
            .update_one(
                doc! { "order_number": order_number },
                doc! {
                    "$push": { "print_history": bson::to_bson(entry)? },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Apply field updates and append the corresponding edit records.
    pub async fn apply_edits(
        &self,
        order_number: &str,
        sets: bson::Document,
        edits: &[EditEntry],
    ) -> RepoResult<Order> {
        let mut set_doc = sets;
        set_doc.insert("updated_at", bson::DateTime::now());

        let edit_bson = edits
            .iter()
            .map(bson::to_bson)
            .collect::<Result<Vec<_>, _>>()?;

        let updated = self
            .coll
            .find_one_and_update(
                doc! { "order_number": order_number },
                doc! {
                    "$set": set_doc,
                    "$push": { "edit_history": { "$each": edit_bson } },
                },
            )
            .return_document(mongodb::options::ReturnDocument::After)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {order_number} not found")))
    }

    /// Remove the live document (soft delete moves it to the archive first).
    pub async fn delete_by_number(&self, order_number: &str) -> RepoResult<bool> {
        let result = self
            .coll
            .delete_one(doc! { "order_number": order_number })
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Orders that predate number assignment, oldest first.
    pub async fn find_unnumbered(&self) -> RepoResult<Vec<Order>> {
        let orders = self
            .coll
            .find(doc! { "$or": [
                { "order_number": { "$exists": false } },
                { "order_number": "" },
            ] })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }

    /// Assign a number to a single legacy order.
    pub async fn set_order_number(
        &self,
        id: bson::oid::ObjectId,
        order_number: &str,
    ) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "order_number": order_number,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .await?;
        Ok(())
    }
}
