//! Product Model
//!
//! Catalog entries embed their reviews and stock history. `rating` is
//! derived: the arithmetic mean of all review ratings, recomputed on
//! every review insert.

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Append-only stock movement record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub at: bson::DateTime,
    /// Signed adjustment
    pub delta: i64,
    /// Stock level after the adjustment
    pub level: i64,
    pub reason: String,
    pub actor: String,
}

/// Embedded customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub author_id: ObjectId,
    pub author_name: String,
    /// 1-5
    pub rating: i32,
    pub comment: String,
    pub at: bson::DateTime,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stock: i64,
    #[serde(default)]
    pub stock_history: Vec<StockEntry>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Mean of `reviews[].rating`; 0 when there are no reviews
    #[serde(default)]
    pub rating: f64,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Product {
    /// Recompute the derived rating from the embedded review set.
    ///
    /// The persisted value is maintained atomically by the repository's
    /// pipeline update; this mirror exists for in-memory use and tests.
    pub fn mean_rating(reviews: &[Review]) -> f64 {
        if reviews.is_empty() {
            return 0.0;
        }
        let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        sum as f64 / reviews.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32) -> Review {
        Review {
            author_id: ObjectId::new(),
            author_name: "Ada".into(),
            rating,
            comment: "ok".into(),
            at: bson::DateTime::now(),
        }
    }

    #[test]
    fn test_mean_rating_is_arithmetic_mean() {
        let reviews: Vec<Review> = [4, 5, 3].into_iter().map(review).collect();
        assert!((Product::mean_rating(&reviews) - 4.0).abs() < f64::EPSILON);

        let reviews: Vec<Review> = [5, 4].into_iter().map(review).collect();
        assert!((Product::mean_rating(&reviews) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_rating_empty_is_zero() {
        assert_eq!(Product::mean_rating(&[]), 0.0);
    }

    #[test]
    fn test_mean_rating_idempotent_for_same_set() {
        let reviews: Vec<Review> = [1, 2, 3, 4, 5].into_iter().map(review).collect();
        let first = Product::mean_rating(&reviews);
        let second = Product::mean_rating(&reviews);
        assert_eq!(first, second);
        assert!((first - 3.0).abs() < f64::EPSILON);
    }
}
