//! Sustainability action catalog schema

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for catalog actions
pub const ACTION_COLLECTION: &str = "actions";

/// Category of a sustainability action
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    #[default]
    Environmental,
    Social,
    Economic,
    Health,
}

/// A catalog-defined sustainability action with a fixed point reward
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ActionDoc {
    #[serde(default)]
    pub metadata: Metadata,

    /// Action identifier (UUID string)
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Points credited when a submission for this action is approved
    pub points: i64,

    #[serde(default)]
    pub category: ActionCategory,

    /// Display icon (emoji)
    #[serde(default)]
    pub icon: String,

    /// Whether a proof image is required when submitting
    #[serde(default)]
    pub proof_required: bool,
}

impl ActionDoc {
    pub fn new(
        title: String,
        description: String,
        points: i64,
        category: ActionCategory,
        icon: String,
        proof_required: bool,
    ) -> Self {
        Self {
            metadata: Metadata::new(),
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description,
            points,
            category,
            icon,
            proof_required,
        }
    }
}

impl IntoIndexes for ActionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ActionDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ActionCategory::Environmental).unwrap();
        assert_eq!(json, "\"environmental\"");
        let back: ActionCategory = serde_json::from_str("\"health\"").unwrap();
        assert_eq!(back, ActionCategory::Health);
    }

    #[test]
    fn test_bson_round_trip() {
        let action = ActionDoc::new(
            "Support local businesses".into(),
            "Purchase from small, local shops and restaurants".into(),
            30,
            ActionCategory::Economic,
            "🌿".into(),
            true,
        );

        let doc = bson::to_document(&action).unwrap();
        let back: ActionDoc = bson::from_document(doc).unwrap();

        assert_eq!(back.id, action.id);
        assert_eq!(back.points, 30);
        assert_eq!(back.category, ActionCategory::Economic);
        assert!(back.proof_required);
    }
}
