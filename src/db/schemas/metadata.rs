//! Shared document metadata

use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle metadata embedded in every document.
///
/// Deletion is soft: removed documents keep their record with
/// `is_deleted` set, and reads filter them out.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Metadata {
    /// When the document was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    /// When the document was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    #[serde(default)]
    pub is_deleted: bool,

    /// When the document was soft-deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
}

impl Metadata {
    /// Fresh metadata stamped with the current time
    pub fn new() -> Self {
        let now = DateTime::now();
        Self {
            created_at: Some(now),
            updated_at: Some(now),
            is_deleted: false,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metadata_is_live() {
        let meta = Metadata::new();
        assert!(!meta.is_deleted);
        assert!(meta.deleted_at.is_none());
        assert_eq!(meta.created_at, meta.updated_at);
    }

    #[test]
    fn test_bare_document_deserializes() {
        let meta: Metadata = bson::from_document(bson::doc! {}).unwrap();
        assert!(!meta.is_deleted);
        assert!(meta.created_at.is_none());
    }
}
