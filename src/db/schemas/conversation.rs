//! Chat conversation schema
//!
//! One linear transcript per account, append-only except for an
//! explicit clear.

use bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for conversations
pub const CONVERSATION_COLLECTION: &str = "conversations";

/// Who produced a chat message
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    #[default]
    User,
    Bot,
}

/// A single transcript entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime,
}

impl ChatMessage {
    pub fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: DateTime::now(),
        }
    }
}

/// Chat transcript keyed by account
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ConversationDoc {
    #[serde(default)]
    pub metadata: Metadata,

    /// Account this transcript belongs to
    pub user_id: String,

    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ConversationDoc {
    /// An empty transcript for an account with no chat history
    pub fn empty(user_id: &str) -> Self {
        Self {
            metadata: Metadata::new(),
            user_id: user_id.to_string(),
            messages: Vec::new(),
        }
    }
}

impl IntoIndexes for ConversationDoc {
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

impl MutMetadata for ConversationDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatRole::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_bson_round_trip_preserves_timestamps() {
        let mut conv = ConversationDoc::empty("u-1");
        conv.messages.push(ChatMessage::now(ChatRole::User, "hi"));
        conv.messages
            .push(ChatMessage::now(ChatRole::Bot, "hello there"));

        let doc = bson::to_document(&conv).unwrap();
        let back: ConversationDoc = bson::from_document(doc).unwrap();

        assert_eq!(back.messages, conv.messages);
        assert_eq!(back.messages[0].at, conv.messages[0].at);
    }
}
