//! Order number allocation
//!
//! Order numbers are a fixed prefix plus a monotonically increasing
//! integer ("DM-145002"). Allocation is serialized through an atomic
//! counter document so concurrent checkouts cannot compute the same
//! number; the unique index on `orders.order_number` remains the final
//! backstop.
//!
//! Two base constants exist on two different paths and are intentionally
//! NOT unified (pending product clarification):
//! - [`CHECKOUT_BASE`] seeds checkout allocation when no numbered order
//!   exists yet.
//! - [`LEGACY_BASE`] is where the historical backfill starts numbering
//!   orders that predate number assignment.

use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;

use crate::db::models::{Counter, ORDER_NUMBER_COUNTER};
use crate::db::repository::{OrderRepository, RepoResult, is_duplicate_key};

/// Human-readable order number prefix
pub const ORDER_PREFIX: &str = "DM-";

/// First number handed out by checkout allocation on an empty store
pub const CHECKOUT_BASE: i64 = 145_000;

/// First number used by the legacy backfill
pub const LEGACY_BASE: i64 = 14_500;

/// Anchored pattern matching well-formed order numbers
pub const NUMBER_PATTERN: &str = r"^DM-\d+$";

/// Pattern for backfill-assigned numbers. The legacy range is five digits
/// (14500 and up); checkout numbers are six.
pub const LEGACY_NUMBER_PATTERN: &str = r"^DM-\d{5}$";

/// Format a sequence value as an order number
pub fn format_number(value: i64) -> String {
    format!("{ORDER_PREFIX}{value}")
}

/// Parse the numeric suffix of a well-formed order number
pub fn parse_number(order_number: &str) -> Option<i64> {
    let suffix = order_number.strip_prefix(ORDER_PREFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Serialized order-number allocator backed by a counter document
#[derive(Clone)]
pub struct OrderNumberAllocator {
    counters: Collection<Counter>,
    orders: OrderRepository,
}

impl OrderNumberAllocator {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            counters: db.collection::<Counter>(crate::db::repository::COUNTERS),
            orders: OrderRepository::new(db),
        }
    }

    /// Allocate the next order number.
    ///
    /// The common path is a single atomic increment-and-read. When the
    /// counter document does not exist yet it is seeded from the highest
    /// pre-existing order number; losing the seeding race to a concurrent
    /// caller just retries the increment.
    pub async fn next(&self) -> RepoResult<String> {
        loop {
            let bumped = self
                .counters
                .find_one_and_update(
                    doc! { "_id": ORDER_NUMBER_COUNTER },
                    doc! { "$inc": { "value": 1 } },
                )
                .return_document(ReturnDocument::After)
                .await?;

            if let Some(counter) = bumped {
                return Ok(format_number(counter.value));
            }

            let seed = self.seed_value().await?;
            match self
                .counters
                .insert_one(Counter {
                    id: ORDER_NUMBER_COUNTER.to_string(),
                    value: seed,
                })
                .await
            {
                Ok(_) => return Ok(format_number(seed)),
                Err(e) if is_duplicate_key(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// First value for a fresh counter: one past the most recently dated
    /// well-formed order number, or the checkout base on an empty store.
    async fn seed_value(&self) -> RepoResult<i64> {
        match self.orders.find_latest_numbered(NUMBER_PATTERN).await? {
            Some(order) => Ok(parse_number(&order.order_number)
                .map(|n| n + 1)
                .unwrap_or(CHECKOUT_BASE)),
            None => Ok(CHECKOUT_BASE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_base_number() {
        assert_eq!(format_number(CHECKOUT_BASE), "DM-145000");
        assert_eq!(format_number(LEGACY_BASE), "DM-14500");
    }

    #[test]
    fn test_parse_roundtrip() {
        assert_eq!(parse_number("DM-145000"), Some(145_000));
        assert_eq!(parse_number("DM-145001"), Some(145_001));
        assert_eq!(parse_number(&format_number(14_500)), Some(LEGACY_BASE));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_number("DM-"), None);
        assert_eq!(parse_number("DM-abc"), None);
        assert_eq!(parse_number("DM--3"), None);
        assert_eq!(parse_number("DX-145000"), None);
        assert_eq!(parse_number("145000"), None);
        assert_eq!(parse_number("DM-145000x"), None);
    }

    #[test]
    fn test_successor_of_existing_orders() {
        // Given DM-145000 and DM-145001, the next allocation is DM-145002
        let latest = parse_number("DM-145001").expect("parse");
        assert_eq!(format_number(latest + 1), "DM-145002");
    }

    #[test]
    fn test_base_constants_not_unified() {
        // Two different magic bases on two different paths; see module docs
        assert_eq!(CHECKOUT_BASE, 145_000);
        assert_eq!(LEGACY_BASE, 14_500);
        assert_ne!(CHECKOUT_BASE, LEGACY_BASE);
    }
}
