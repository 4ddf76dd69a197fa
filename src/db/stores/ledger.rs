//! Ledger store
//!
//! Every mutation is a single find-and-modify with an aggregation
//! pipeline, so read-modify-write races cannot produce lost updates and
//! the credit clamp is applied server-side: no interleaving can persist
//! a negative balance. A missing ledger materializes with zeroed
//! defaults on first access (upsert-on-read).

use bson::{doc, DateTime, Document};
use mongodb::options::ReturnDocument;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{PurchaseItem, StatsDoc, STATS_COLLECTION};
use crate::types::GroveError;

/// Store handle for per-user ledgers
#[derive(Clone)]
pub struct LedgerStore {
    col: MongoCollection<StatsDoc>,
}

impl LedgerStore {
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            col: mongo.collection(STATS_COLLECTION).await?,
        })
    }

    /// Read a ledger, materializing a zeroed record if absent.
    ///
    /// Never fails for a well-formed user id.
    pub async fn get(&self, user_id: &str) -> Result<StatsDoc, GroveError> {
        self.run_pipeline(user_id, Document::new()).await
    }

    /// Full overwrite of a ledger record
    pub async fn set(&self, stats: StatsDoc) -> Result<(), GroveError> {
        let mut stats = stats;
        stats.metadata.updated_at = Some(DateTime::now());

        self.col
            .inner()
            .replace_one(doc! { "user_id": &stats.user_id }, stats)
            .upsert(true)
            .await
            .map_err(|e| GroveError::Database(format!("Replace failed: {}", e)))?;

        Ok(())
    }

    /// `tasks_completed += by`
    pub async fn increment_tasks(&self, user_id: &str, by: i64) -> Result<StatsDoc, GroveError> {
        self.run_pipeline(user_id, doc! { "tasks_completed": counter_expr("tasks_completed", by) })
            .await
    }

    /// `credits = max(0, credits + delta)`; delta may be negative.
    ///
    /// Over-spend is absorbed by the clamp rather than rejected.
    pub async fn add_credits(&self, user_id: &str, delta: i64) -> Result<StatsDoc, GroveError> {
        self.run_pipeline(user_id, doc! { "credits": credits_expr(delta) })
            .await
    }

    /// Prepend a purchase (most recent first) with a server-assigned
    /// timestamp
    pub async fn add_purchase(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        price: i64,
    ) -> Result<StatsDoc, GroveError> {
        let item = PurchaseItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            purchased_at: DateTime::now(),
        };
        let item = bson::to_bson(&item)
            .map_err(|e| GroveError::Internal(format!("Purchase encoding failed: {}", e)))?;

        self.run_pipeline(user_id, doc! { "purchases": prepend_purchase_expr(item) })
            .await
    }

    /// Apply an approved submission: `tasks_completed += 1` and
    /// `credits += points` in one atomic write
    pub async fn apply_approval(&self, user_id: &str, points: i64) -> Result<StatsDoc, GroveError> {
        self.run_pipeline(
            user_id,
            doc! {
                "tasks_completed": counter_expr("tasks_completed", 1),
                "credits": credits_expr(points),
            },
        )
        .await
    }

    /// `trash_calls += by`
    pub async fn increment_trash_calls(
        &self,
        user_id: &str,
        by: i64,
    ) -> Result<StatsDoc, GroveError> {
        self.run_pipeline(user_id, doc! { "trash_calls": counter_expr("trash_calls", by) })
            .await
    }

    /// Run one atomic upserting pipeline update and return the new
    /// ledger state
    async fn run_pipeline(
        &self,
        user_id: &str,
        overrides: Document,
    ) -> Result<StatsDoc, GroveError> {
        let pipeline = update_pipeline(overrides);

        let updated = self
            .col
            .inner()
            .find_one_and_update(doc! { "user_id": user_id }, pipeline)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| GroveError::Database(format!("Ledger update failed: {}", e)))?;

        updated.ok_or_else(|| {
            GroveError::Database(format!("Ledger upsert returned no document for {}", user_id))
        })
    }
}

/// Build the single-stage update pipeline: normalize every field to its
/// zero default, then apply the operation's overrides on top.
fn update_pipeline(overrides: Document) -> Vec<Document> {
    let now = DateTime::now();

    let mut set = doc! {
        "tasks_completed": { "$ifNull": ["$tasks_completed", 0_i64] },
        "credits": { "$max": [0_i64, { "$ifNull": ["$credits", 0_i64] }] },
        "purchases": { "$ifNull": ["$purchases", []] },
        "trash_calls": { "$ifNull": ["$trash_calls", 0_i64] },
        "metadata.is_deleted": { "$ifNull": ["$metadata.is_deleted", false] },
        "metadata.created_at": { "$ifNull": ["$metadata.created_at", now] },
        "metadata.updated_at": now,
    };

    for (key, value) in overrides {
        set.insert(key, value);
    }

    vec![doc! { "$set": set }]
}

/// `max(0, ifNull(credits, 0) + delta)`
fn credits_expr(delta: i64) -> Document {
    doc! {
        "$max": [0_i64, { "$add": [{ "$ifNull": ["$credits", 0_i64] }, delta] }]
    }
}

/// `ifNull(field, 0) + by`
fn counter_expr(field: &str, by: i64) -> Document {
    doc! {
        "$add": [{ "$ifNull": [format!("${}", field), 0_i64] }, by]
    }
}

/// `concat([item], ifNull(purchases, []))`, so the newest purchase is first
fn prepend_purchase_expr(item: bson::Bson) -> Document {
    doc! {
        "$concatArrays": [[item], { "$ifNull": ["$purchases", []] }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn test_credits_expr_clamps_at_zero() {
        let expr = credits_expr(-50);
        let max = expr.get_array("$max").unwrap();
        // First operand is the zero floor
        assert_eq!(max[0], Bson::Int64(0));
        // Second operand adds the (negative) delta to the current value
        let add = max[1].as_document().unwrap().get_array("$add").unwrap();
        assert_eq!(add[1], Bson::Int64(-50));
    }

    #[test]
    fn test_counter_expr_references_field() {
        let expr = counter_expr("trash_calls", 1);
        let add = expr.get_array("$add").unwrap();
        let if_null = add[0].as_document().unwrap().get_array("$ifNull").unwrap();
        assert_eq!(if_null[0], Bson::String("$trash_calls".into()));
        assert_eq!(add[1], Bson::Int64(1));
    }

    #[test]
    fn test_prepend_purchase_puts_item_first() {
        let item = bson::to_bson(&PurchaseItem {
            id: "1".into(),
            name: "Reusable Water Bottle".into(),
            price: 50,
            purchased_at: DateTime::now(),
        })
        .unwrap();

        let expr = prepend_purchase_expr(item.clone());
        let concat = expr.get_array("$concatArrays").unwrap();
        // New item array comes before the existing list
        assert_eq!(concat[0].as_array().unwrap()[0], item);
    }

    #[test]
    fn test_update_pipeline_overrides_win() {
        let pipeline = update_pipeline(doc! { "credits": credits_expr(25) });
        assert_eq!(pipeline.len(), 1);

        let set = pipeline[0].get_document("$set").unwrap();
        // The override replaced the normalization entry for credits
        let max = set.get_document("credits").unwrap().get_array("$max").unwrap();
        assert!(max[1].as_document().unwrap().contains_key("$add"));
        // Untouched counters keep their zero defaults
        assert!(set.get_document("tasks_completed").unwrap().contains_key("$ifNull"));
        assert!(set.contains_key("metadata.updated_at"));
    }
}
