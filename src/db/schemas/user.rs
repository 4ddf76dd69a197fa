//! User account schema
//!
//! Stores account credentials and profile fields. The email address is
//! the login identifier and carries a unique index, so a duplicate
//! signup fails the write even if the caller's existence check raced.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User account stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Stable account identifier (UUID string)
    pub id: String,

    /// Display name
    pub name: String,

    /// Login email, unique across accounts
    pub email: String,

    /// Contact phone number
    #[serde(default)]
    pub phone: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,
}

impl UserDoc {
    /// Create a new user document
    pub fn new(name: String, email: String, phone: String, password_hash: String) -> Self {
        Self {
            metadata: Metadata::new(),
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            password_hash,
            // Signup auto-verifies; there is no verification mail flow
            email_verified: true,
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on email
            (
                doc! { "email": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("email_unique".to_string())
                        .build(),
                ),
            ),
            // Index on id for lookups
            (
                doc! { "id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_id_and_verified_email() {
        let user = UserDoc::new(
            "Asha".into(),
            "asha@example.com".into(),
            "555-0100".into(),
            "$argon2id$stub".into(),
        );
        assert!(!user.id.is_empty());
        assert!(user.email_verified);
        assert!(user.metadata.created_at.is_some());
    }

    #[test]
    fn test_bson_round_trip() {
        let user = UserDoc::new(
            "Asha".into(),
            "asha@example.com".into(),
            "555-0100".into(),
            "$argon2id$stub".into(),
        );

        let doc = bson::to_document(&user).unwrap();
        let back: UserDoc = bson::from_document(doc).unwrap();

        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
        assert_eq!(back.metadata.created_at, user.metadata.created_at);
    }
}
