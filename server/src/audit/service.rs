//! Admin log service
//!
//! Append-only audit trail of privileged mutations, stored in its own
//! collection. Every entry commits to its predecessor through a SHA-256
//! hash chain, so later tampering breaks verification.

use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Collection, Database};
use sha2::{Digest, Sha256};

use super::types::{
    AdminAction, AdminLogEntry, AdminLogQuery, ChainBreak, ChainVerification,
};
use crate::db::repository::ADMIN_LOGS;

/// Hash of the (nonexistent) entry before the first one
const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Admin log service
#[derive(Clone)]
pub struct AdminLogService {
    coll: Collection<AdminLogEntry>,
}

impl std::fmt::Debug for AdminLogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminLogService").finish_non_exhaustive()
    }
}

impl AdminLogService {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection::<AdminLogEntry>(ADMIN_LOGS),
        }
    }

    /// Record a privileged mutation.
    ///
    /// Audit failures are logged and swallowed; they never fail the
    /// request that triggered them.
    pub async fn log(
        &self,
        action: AdminAction,
        target_type: impl Into<String>,
        target_id: impl Into<String>,
        actor_id: Option<String>,
        actor_name: Option<String>,
        details: serde_json::Value,
    ) {
        if let Err(e) = self
            .append(
                action,
                target_type.into(),
                target_id.into(),
                actor_id,
                actor_name,
                details,
            )
            .await
        {
            tracing::error!(action = %action, error = %e, "Failed to append admin log entry");
        }
    }

    /// Append an entry, linking it to the current chain head.
    pub async fn append(
        &self,
        action: AdminAction,
        target_type: String,
        target_id: String,
        actor_id: Option<String>,
        actor_name: Option<String>,
        details: serde_json::Value,
    ) -> Result<AdminLogEntry, mongodb::error::Error> {
        let head = self
            .coll
            .find_one(doc! {})
            .sort(doc! { "seq": -1 })
            .await?;

        let (seq, prev_hash) = match head {
            Some(entry) => (entry.seq + 1, entry.curr_hash),
            None => (1, GENESIS_HASH.to_string()),
        };

        let at = bson::DateTime::now();
        let curr_hash = compute_hash(
            &prev_hash,
            seq,
            at.timestamp_millis(),
            action,
            &target_type,
            &target_id,
            actor_id.as_deref(),
            actor_name.as_deref(),
            &details,
        );

        let mut entry = AdminLogEntry {
            id: None,
            seq,
            at,
            action,
            target_type,
            target_id,
            actor_id,
            actor_name,
            details,
            prev_hash,
            curr_hash,
        };

        let result = self.coll.insert_one(&entry).await?;
        entry.id = result.inserted_id.as_object_id();
        Ok(entry)
    }

    /// Query entries, newest first, with a total count for paging.
    pub async fn query(
        &self,
        q: &AdminLogQuery,
    ) -> Result<(Vec<AdminLogEntry>, u64), mongodb::error::Error> {
        let mut filter = doc! {};
        if q.from.is_some() || q.to.is_some() {
            let mut range = doc! {};
            if let Some(from) = q.from {
                range.insert("$gte", bson::DateTime::from_millis(from));
            }
            if let Some(to) = q.to {
                range.insert("$lte", bson::DateTime::from_millis(to));
            }
            filter.insert("at", range);
        }
        if let Some(action) = q.action {
            // snake_case, matching storage
            if let Ok(bson::Bson::String(s)) = bson::to_bson(&action) {
                filter.insert("action", s);
            }
        }
        if let Some(actor_id) = &q.actor_id {
            filter.insert("actor_id", actor_id.as_str());
        }
        if let Some(target_type) = &q.target_type {
            filter.insert("target_type", target_type.as_str());
        }

        let total = self.coll.count_documents(filter.clone()).await?;
        let items = self
            .coll
            .find(filter)
            .sort(doc! { "seq": -1 })
            .skip(q.offset)
            .limit(q.limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    /// Recompute every hash and check the links.
    pub async fn verify_chain(&self) -> Result<ChainVerification, mongodb::error::Error> {
        let entries: Vec<AdminLogEntry> = self
            .coll
            .find(doc! {})
            .sort(doc! { "seq": 1 })
            .await?
            .try_collect()
            .await?;

        let mut breaks = Vec::new();
        let mut expected_prev = GENESIS_HASH.to_string();

        for entry in &entries {
            if entry.prev_hash != expected_prev {
                breaks.push(ChainBreak {
                    seq: entry.seq,
                    expected_hash: expected_prev.clone(),
                    actual_hash: entry.prev_hash.clone(),
                });
            }

            let recomputed = compute_hash(
                &entry.prev_hash,
                entry.seq,
                entry.at.timestamp_millis(),
                entry.action,
                &entry.target_type,
                &entry.target_id,
                entry.actor_id.as_deref(),
                entry.actor_name.as_deref(),
                &entry.details,
            );
            if recomputed != entry.curr_hash {
                breaks.push(ChainBreak {
                    seq: entry.seq,
                    expected_hash: recomputed,
                    actual_hash: entry.curr_hash.clone(),
                });
            }

            expected_prev = entry.curr_hash.clone();
        }

        Ok(ChainVerification {
            total_entries: entries.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }
}

/// Hash an entry's content, committing to the previous hash.
///
/// Variable-length fields are separated with NUL bytes; optional fields
/// carry a tag byte so None and Some("") hash differently.
#[allow(clippy::too_many_arguments)]
fn compute_hash(
    prev_hash: &str,
    seq: i64,
    timestamp_millis: i64,
    action: AdminAction,
    target_type: &str,
    target_id: &str,
    actor_id: Option<&str>,
    actor_name: Option<&str>,
    details: &serde_json::Value,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(seq.to_le_bytes());
    hasher.update(timestamp_millis.to_le_bytes());

    // action is serde snake_case, stable and identical to storage
    let action_str = serde_json::to_string(&action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    hasher.update(target_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(target_id.as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, actor_id);
    hash_optional(&mut hasher, actor_name);

    let details_str = serde_json::to_string(details).unwrap_or_default();
    hasher.update(details_str.as_bytes());

    hex::encode(hasher.finalize())
}

fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => hasher.update(b"\x00"),
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_commits_to_prev() {
        let details = serde_json::json!({"field": "status"});
        let a = compute_hash(
            GENESIS_HASH,
            1,
            1_700_000_000_000,
            AdminAction::OrderEdited,
            "order",
            "DM-145002",
            Some("651f1a2b3c4d5e6f708192a3"),
            Some("Ada"),
            &details,
        );
        let b = compute_hash(
            &a,
            2,
            1_700_000_000_001,
            AdminAction::OrderEdited,
            "order",
            "DM-145002",
            Some("651f1a2b3c4d5e6f708192a3"),
            Some("Ada"),
            &details,
        );
        assert_ne!(a, b);

        // Same inputs reproduce the same hash
        let a2 = compute_hash(
            GENESIS_HASH,
            1,
            1_700_000_000_000,
            AdminAction::OrderEdited,
            "order",
            "DM-145002",
            Some("651f1a2b3c4d5e6f708192a3"),
            Some("Ada"),
            &details,
        );
        assert_eq!(a, a2);
    }

    #[test]
    fn test_none_and_empty_actor_hash_differently() {
        let details = serde_json::json!({});
        let with_none = compute_hash(
            GENESIS_HASH,
            1,
            0,
            AdminAction::LoginFailed,
            "auth",
            "x",
            None,
            None,
            &details,
        );
        let with_empty = compute_hash(
            GENESIS_HASH,
            1,
            0,
            AdminAction::LoginFailed,
            "auth",
            "x",
            Some(""),
            None,
            &details,
        );
        assert_ne!(with_none, with_empty);
    }
}
