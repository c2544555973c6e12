//! Payment Repository

use mongodb::bson::{self, doc};
use mongodb::{Collection, Database};

use super::{PAYMENTS, RepoError, RepoResult, is_duplicate_key};
use crate::db::models::{Payment, PaymentState};

#[derive(Clone)]
pub struct PaymentRepository {
    coll: Collection<Payment>,
}

impl PaymentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<Payment>(PAYMENTS),
        }
    }

    pub async fn find_by_reference(&self, reference: &str) -> RepoResult<Option<Payment>> {
        Ok(self.coll.find_one(doc! { "reference": reference }).await?)
    }

    pub async fn create(&self, mut payment: Payment) -> RepoResult<Payment> {
        let result = self.coll.insert_one(&payment).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepoError::Duplicate(format!(
                    "Payment reference '{}' already exists",
                    payment.reference
                ))
            } else {
                e.into()
            }
        })?;
        payment.id = result.inserted_id.as_object_id();
        Ok(payment)
    }

    pub async fn update_status(
        &self,
        reference: &str,
        status: PaymentState,
        raw: Option<&serde_json::Value>,
    ) -> RepoResult<Payment> {
        let mut sets = doc! {
            "status": bson::to_bson(&status)?,
            "updated_at": bson::DateTime::now(),
        };
        if let Some(raw) = raw {
            sets.insert("raw", bson::to_bson(raw)?);
        }

        let updated = self
            .coll
            .find_one_and_update(doc! { "reference": reference }, doc! { "$set": sets })
            .return_document(mongodb::options::ReturnDocument::After)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Payment {reference} not found")))
    }
}
