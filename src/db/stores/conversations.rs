//! Conversation store
//!
//! Appends are atomic `$push` updates with upsert, so concurrent sends
//! from the same account interleave without losing messages.

use bson::{doc, DateTime};

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{ChatMessage, ConversationDoc, CONVERSATION_COLLECTION};
use crate::types::GroveError;

/// Store handle for chat transcripts
#[derive(Clone)]
pub struct ConversationStore {
    col: MongoCollection<ConversationDoc>,
}

impl ConversationStore {
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            col: mongo.collection(CONVERSATION_COLLECTION).await?,
        })
    }

    /// Read a transcript; an account with no history gets an empty one
    pub async fn get(&self, user_id: &str) -> Result<ConversationDoc, GroveError> {
        Ok(self
            .col
            .find_one(doc! { "user_id": user_id })
            .await?
            .unwrap_or_else(|| ConversationDoc::empty(user_id)))
    }

    /// Append messages to a transcript, creating it if absent
    pub async fn append(&self, user_id: &str, messages: &[ChatMessage]) -> Result<(), GroveError> {
        if messages.is_empty() {
            return Ok(());
        }

        let entries = bson::to_bson(messages)
            .map_err(|e| GroveError::Internal(format!("Message encoding failed: {}", e)))?;

        self.col
            .inner()
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$push": { "messages": { "$each": entries } },
                    "$set": { "metadata.updated_at": DateTime::now() },
                    "$setOnInsert": {
                        "metadata.is_deleted": false,
                        "metadata.created_at": DateTime::now(),
                    },
                },
            )
            .upsert(true)
            .await
            .map_err(|e| GroveError::Database(format!("Append failed: {}", e)))?;

        Ok(())
    }

    /// Reset a transcript to empty with a fresh timestamp
    pub async fn clear(&self, user_id: &str) -> Result<(), GroveError> {
        self.col
            .inner()
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$set": {
                        "messages": [],
                        "metadata.is_deleted": false,
                        "metadata.updated_at": DateTime::now(),
                    },
                    "$setOnInsert": { "metadata.created_at": DateTime::now() },
                },
            )
            .upsert(true)
            .await
            .map_err(|e| GroveError::Database(format!("Clear failed: {}", e)))?;

        Ok(())
    }
}
