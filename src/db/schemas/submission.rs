//! Action-proof submission schema
//!
//! A submission is created pending and resolved exactly once to
//! approved or rejected. Points and action title are denormalized at
//! submit time so catalog deletions leave history readable.

use bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for submissions
pub const SUBMISSION_COLLECTION: &str = "submissions";

/// Review state of a submission
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// Whether this state accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Wire name as stored in MongoDB
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action-proof submission awaiting (or past) admin review
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SubmissionDoc {
    #[serde(default)]
    pub metadata: Metadata,

    /// Submission identifier (UUID string)
    pub id: String,

    /// Submitting account
    pub user_id: String,

    /// Catalog action this proof is for; may be orphaned if the action
    /// is later deleted
    pub action_id: String,

    /// Action title at submit time
    pub action_title: String,

    /// Proof image as a data URI
    #[serde(default)]
    pub proof_image: String,

    /// Free-form description from the submitter
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: SubmissionStatus,

    /// When the proof was submitted
    pub submitted_at: DateTime,

    /// Points awarded on approval, fixed at submit time
    pub points: i64,
}

impl Default for SubmissionDoc {
    fn default() -> Self {
        Self {
            metadata: Metadata::default(),
            id: String::new(),
            user_id: String::new(),
            action_id: String::new(),
            action_title: String::new(),
            proof_image: String::new(),
            description: String::new(),
            status: SubmissionStatus::default(),
            submitted_at: DateTime::MIN,
            points: 0,
        }
    }
}

impl SubmissionDoc {
    /// Create a new pending submission
    pub fn new(
        user_id: String,
        action_id: String,
        action_title: String,
        proof_image: String,
        description: String,
        points: i64,
    ) -> Self {
        Self {
            metadata: Metadata::new(),
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            action_id,
            action_title,
            proof_image,
            description,
            status: SubmissionStatus::Pending,
            submitted_at: DateTime::now(),
            points,
        }
    }
}

impl IntoIndexes for SubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                ),
            ),
            // Admin view filters by status and sorts by submit time
            (
                doc! { "status": 1, "submitted_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("status_submitted_at".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for SubmissionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_submission_is_pending() {
        let sub = SubmissionDoc::new(
            "u-1".into(),
            "a-1".into(),
            "Use public transportation".into(),
            "data:image/jpeg;base64,AAAA".into(),
            "took the bus".into(),
            50,
        );
        assert_eq!(sub.status, SubmissionStatus::Pending);
        assert!(!sub.status.is_terminal());
        assert_eq!(sub.points, 50);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(SubmissionStatus::Pending.as_str(), "pending");
        assert_eq!(SubmissionStatus::Approved.as_str(), "approved");
        assert_eq!(SubmissionStatus::Rejected.as_str(), "rejected");
        assert!(SubmissionStatus::Approved.is_terminal());
        assert!(SubmissionStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_bson_round_trip_preserves_submitted_at() {
        let sub = SubmissionDoc::new(
            "u-1".into(),
            "a-1".into(),
            "Reduce energy consumption".into(),
            String::new(),
            String::new(),
            40,
        );

        let doc = bson::to_document(&sub).unwrap();
        let back: SubmissionDoc = bson::from_document(doc).unwrap();

        assert_eq!(back.id, sub.id);
        assert_eq!(back.status, SubmissionStatus::Pending);
        assert_eq!(back.submitted_at, sub.submitted_at);
    }
}
