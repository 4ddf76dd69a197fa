//! Per-user ledger schema
//!
//! One aggregate record per account: completed task count, credit
//! balance, purchase history (most recent first), and pickup requests.
//! Records materialize lazily with zeroed defaults on first access.

use bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for ledgers
pub const STATS_COLLECTION: &str = "stats";

/// A marketplace purchase, immutable once appended
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PurchaseItem {
    /// Catalog item id
    pub id: String,

    /// Item name at time of purchase
    pub name: String,

    /// Price paid, in credits
    pub price: i64,

    /// Server-assigned purchase timestamp
    pub purchased_at: DateTime,
}

/// Per-user ledger aggregate
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StatsDoc {
    #[serde(default)]
    pub metadata: Metadata,

    /// Account this ledger belongs to
    pub user_id: String,

    /// Number of approved action submissions
    #[serde(default)]
    pub tasks_completed: i64,

    /// Credit balance, never negative
    #[serde(default)]
    pub credits: i64,

    /// Purchase history, most recent first
    #[serde(default)]
    pub purchases: Vec<PurchaseItem>,

    /// Number of confirmed waste-pickup requests
    #[serde(default)]
    pub trash_calls: i64,
}

impl StatsDoc {
    /// A zeroed ledger for an account with no history yet
    pub fn zeroed(user_id: &str) -> Self {
        Self {
            metadata: Metadata::new(),
            user_id: user_id.to_string(),
            tasks_completed: 0,
            credits: 0,
            purchases: Vec::new(),
            trash_calls: 0,
        }
    }
}

impl IntoIndexes for StatsDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for StatsDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_defaults() {
        let stats = StatsDoc::zeroed("u-1");
        assert_eq!(stats.user_id, "u-1");
        assert_eq!(stats.tasks_completed, 0);
        assert_eq!(stats.credits, 0);
        assert_eq!(stats.trash_calls, 0);
        assert!(stats.purchases.is_empty());
    }

    #[test]
    fn test_bson_round_trip_preserves_dates() {
        let mut stats = StatsDoc::zeroed("u-1");
        stats.credits = 120;
        stats.purchases.push(PurchaseItem {
            id: "3".into(),
            name: "Solar Charger".into(),
            price: 200,
            purchased_at: DateTime::now(),
        });

        let doc = bson::to_document(&stats).unwrap();
        let back: StatsDoc = bson::from_document(doc).unwrap();

        assert_eq!(back.credits, 120);
        assert_eq!(back.purchases, stats.purchases);
        assert_eq!(
            back.purchases[0].purchased_at,
            stats.purchases[0].purchased_at
        );
    }

    #[test]
    fn test_missing_fields_deserialize_to_zero() {
        // A legacy record with only a user_id still loads
        let doc = doc! { "user_id": "u-2" };
        let back: StatsDoc = bson::from_document(doc).unwrap();
        assert_eq!(back.credits, 0);
        assert_eq!(back.tasks_completed, 0);
        assert!(back.purchases.is_empty());
    }
}
