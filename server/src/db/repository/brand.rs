//! Brand Repository

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{BRANDS, RepoError, RepoResult, is_duplicate_key};
use crate::db::models::Brand;

#[derive(Clone)]
pub struct BrandRepository {
    coll: Collection<Brand>,
}

impl BrandRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<Brand>(BRANDS),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Brand>> {
        let brands = self
            .coll
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(brands)
    }

    pub async fn create(&self, mut brand: Brand) -> RepoResult<Brand> {
        let result = self.coll.insert_one(&brand).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepoError::Duplicate(format!("Brand '{}' already exists", brand.name))
            } else {
                e.into()
            }
        })?;
        brand.id = result.inserted_id.as_object_id();
        Ok(brand)
    }
}
