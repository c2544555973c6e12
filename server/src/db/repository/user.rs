//! User Repository

use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{ClientSession, Collection, Database};

use super::{RepoError, RepoResult, USERS, is_duplicate_key};
use crate::db::models::{AccountStatus, Role, User};

#[derive(Clone)]
pub struct UserRepository {
    coll: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<User>(USERS),
        }
    }

    /// All users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users = self
            .coll
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<User>> {
        Ok(self.coll.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.coll.find_one(doc! { "email": email }).await?)
    }

    /// Insert a new user. The unique email index turns races into Duplicate.
    pub async fn create(&self, mut user: User) -> RepoResult<User> {
        let result = self.coll.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepoError::Duplicate(format!("Email '{}' is already registered", user.email))
            } else {
                e.into()
            }
        })?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Change a user's role, returning the updated record
    pub async fn update_role(&self, id: ObjectId, role: Role) -> RepoResult<User> {
        let updated = self
            .coll
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "role": bson::to_bson(&role)?,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .return_document(mongodb::options::ReturnDocument::After)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
    }

    pub async fn find_by_verify_token(&self, token: &str) -> RepoResult<Option<User>> {
        Ok(self.coll.find_one(doc! { "verify_token": token }).await?)
    }

    pub async fn find_by_reset_token(&self, token: &str) -> RepoResult<Option<User>> {
        Ok(self.coll.find_one(doc! { "reset_token": token }).await?)
    }

    /// Mark the account verified and consume the verify token (single use)
    pub async fn mark_verified(&self, id: ObjectId) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": { "is_verified": true, "updated_at": bson::DateTime::now() },
                    "$unset": { "verify_token": "", "verify_token_expires_at": "" },
                },
            )
            .await?;
        Ok(())
    }

    pub async fn set_reset_token(
        &self,
        id: ObjectId,
        token: &str,
        expires_at: bson::DateTime,
    ) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "reset_token": token,
                    "reset_token_expires_at": expires_at,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .await?;
        Ok(())
    }

    /// Store the new password hash and consume the reset token (single use)
    pub async fn update_password_and_clear_reset(
        &self,
        id: ObjectId,
        password_hash: &str,
    ) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": { "password_hash": password_hash, "updated_at": bson::DateTime::now() },
                    "$unset": { "reset_token": "", "reset_token_expires_at": "" },
                },
            )
            .await?;
        Ok(())
    }

    pub async fn set_status(&self, id: ObjectId, status: AccountStatus) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "status": bson::to_bson(&status)?,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .await?;
        Ok(())
    }

    pub async fn set_virtual_account(
        &self,
        id: ObjectId,
        account: &crate::db::models::VirtualAccount,
    ) -> RepoResult<()> {
        self.coll
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "virtual_account": bson::to_bson(account)?,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .await?;
        Ok(())
    }

    /// Grow the running ledger after a deferred-payment order.
    ///
    /// Runs inside the caller's transaction so the order write and the
    /// ledger increment commit together.
    pub async fn apply_ledger_increment(
        &self,
        session: &mut ClientSession,
        user_id: ObjectId,
        amount: f64,
    ) -> RepoResult<()> {
        let result = self
            .coll
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$inc": { "ledger_balance": amount, "lifetime_value": amount },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
            )
            .session(&mut *session)
            .await?;
        if result.matched_count == 0 {
            return Err(RepoError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }
}
