//! Per-feature store handles
//!
//! Each store wraps one typed collection with the domain operations the
//! routes need. Handles are constructed once at startup and injected
//! into the request path; nothing here is a global.

mod actions;
mod conversations;
mod ledger;
mod submissions;
mod users;

pub use actions::ActionStore;
pub use conversations::ConversationStore;
pub use ledger::LedgerStore;
pub use submissions::SubmissionStore;
pub use users::UserStore;

use crate::db::MongoClient;
use crate::types::GroveError;

/// All store handles, opened together at startup
#[derive(Clone)]
pub struct Stores {
    pub users: UserStore,
    pub ledger: LedgerStore,
    pub submissions: SubmissionStore,
    pub actions: ActionStore,
    pub conversations: ConversationStore,
}

impl Stores {
    /// Open every collection and apply schema indexes
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            users: UserStore::init(mongo).await?,
            ledger: LedgerStore::init(mongo).await?,
            submissions: SubmissionStore::init(mongo).await?,
            actions: ActionStore::init(mongo).await?,
            conversations: ConversationStore::init(mongo).await?,
        })
    }
}
