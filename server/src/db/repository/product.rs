//! Product Repository
//!
//! Review inserts and stock adjustments use single-document aggregation
//! pipeline updates so the derived fields (`rating`, history `level`) are
//! recomputed atomically with the write, leaving no read-modify-write window.

use futures::TryStreamExt;
use mongodb::bson::{self, Bson, doc, oid::ObjectId};
use mongodb::{Collection, Database};

use super::{PRODUCTS, RepoError, RepoResult};
use crate::db::models::{Product, Review};

#[derive(Clone)]
pub struct ProductRepository {
    coll: Collection<Product>,
}

impl ProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<Product>(PRODUCTS),
        }
    }

    /// All products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products = self
            .coll
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<Product>> {
        Ok(self.coll.find_one(doc! { "_id": id }).await?)
    }

    pub async fn create(&self, mut product: Product) -> RepoResult<Product> {
        let result = self.coll.insert_one(&product).await?;
        product.id = result.inserted_id.as_object_id();
        Ok(product)
    }

    pub async fn delete(&self, id: ObjectId) -> RepoResult<bool> {
        let result = self.coll.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    /// Append a review and recompute the mean rating in one atomic update.
    pub async fn add_review(&self, id: ObjectId, review: &Review) -> RepoResult<Product> {
        let review_bson = bson::to_bson(review)?;
        // $literal keeps review text out of expression evaluation
        let pipeline = vec![
            doc! { "$set": {
                "reviews": { "$concatArrays": [
                    { "$ifNull": ["$reviews", []] },
                    { "$literal": [review_bson] },
                ] },
            } },
            doc! { "$set": {
                "rating": { "$avg": "$reviews.rating" },
                "updated_at": bson::DateTime::now(),
            } },
        ];

        let result = self.coll.update_one(doc! { "_id": id }, pipeline).await?;
        if result.matched_count == 0 {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Adjust stock and append the movement record atomically.
    ///
    /// The filter refuses adjustments that would take the level negative;
    /// the caller distinguishes that from a missing product.
    pub async fn adjust_stock(
        &self,
        id: ObjectId,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> RepoResult<Product> {
        let mut filter = doc! { "_id": id };
        if delta < 0 {
            filter.insert("stock", doc! { "$gte": -delta });
        }

        // "level" reads the post-adjustment value; the free-text fields are
        // $literal so they never evaluate as field paths
        let entry = doc! {
            "at": bson::DateTime::now(),
            "delta": delta,
            "level": "$stock",
            "reason": { "$literal": reason },
            "actor": { "$literal": actor },
        };
        let pipeline = vec![
            doc! { "$set": { "stock": { "$add": ["$stock", delta] } } },
            doc! { "$set": {
                "stock_history": {
                    "$concatArrays": [ { "$ifNull": ["$stock_history", []] }, [Bson::Document(entry)] ],
                },
                "updated_at": bson::DateTime::now(),
            } },
        ];

        let result = self.coll.update_one(filter, pipeline).await?;
        if result.matched_count == 0 {
            // Missing product or insufficient stock
            return match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Validation(format!(
                    "Stock adjustment of {delta} would take product {id} below zero"
                ))),
                None => Err(RepoError::NotFound(format!("Product {id} not found"))),
            };
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }
}
