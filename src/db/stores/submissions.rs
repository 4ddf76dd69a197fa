//! Submission store
//!
//! Status transitions are a guarded compare-and-set: the update filter
//! pins `status == "pending"`, so a submission resolves exactly once
//! and terminal states never revert or flip.

use bson::{doc, DateTime};
use mongodb::options::ReturnDocument;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{SubmissionDoc, SubmissionStatus, SUBMISSION_COLLECTION};
use crate::types::GroveError;

/// Store handle for action-proof submissions
#[derive(Clone)]
pub struct SubmissionStore {
    col: MongoCollection<SubmissionDoc>,
}

impl SubmissionStore {
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            col: mongo.collection(SUBMISSION_COLLECTION).await?,
        })
    }

    /// Insert a new pending submission
    pub async fn add(&self, submission: SubmissionDoc) -> Result<(), GroveError> {
        self.col.insert_one(submission).await
    }

    /// All submissions across all users (admin view), most recent
    /// first, optionally filtered by status
    pub async fn list_all(
        &self,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionDoc>, GroveError> {
        let filter = match status {
            Some(s) => doc! { "status": s.as_str() },
            None => doc! {},
        };

        self.col
            .find_many(filter, Some(doc! { "submitted_at": -1 }))
            .await
    }

    /// Transition a pending submission to a terminal status.
    ///
    /// Returns the resolved record. Fails with a conflict if the
    /// submission was already resolved, not-found if it never existed.
    pub async fn resolve(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<SubmissionDoc, GroveError> {
        if !status.is_terminal() {
            return Err(GroveError::BadRequest(
                "Submissions can only be resolved to approved or rejected".into(),
            ));
        }

        let updated = self
            .col
            .inner()
            .find_one_and_update(
                doc! {
                    "id": id,
                    "status": SubmissionStatus::Pending.as_str(),
                    "metadata.is_deleted": { "$ne": true },
                },
                doc! {
                    "$set": {
                        "status": status.as_str(),
                        "metadata.updated_at": DateTime::now(),
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| GroveError::Database(format!("Status update failed: {}", e)))?;

        match updated {
            Some(submission) => Ok(submission),
            None => {
                // Distinguish "already resolved" from "no such submission"
                match self.col.find_one(doc! { "id": id }).await? {
                    Some(existing) => Err(GroveError::Conflict(format!(
                        "Submission {} was already {}",
                        id, existing.status
                    ))),
                    None => Err(GroveError::NotFound(format!("No submission with id {}", id))),
                }
            }
        }
    }
}
