//! Persistence layer for Grove
//!
//! MongoDB client wrapper, document schemas, and the per-feature store
//! handles that the request path is given at startup.

pub mod mongo;
pub mod schemas;
pub mod stores;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};
pub use stores::{
    ActionStore, ConversationStore, LedgerStore, Stores, SubmissionStore, UserStore,
};
