//! User account store

use bson::doc;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::types::GroveError;

/// Store handle for user accounts
#[derive(Clone)]
pub struct UserStore {
    col: MongoCollection<UserDoc>,
}

impl UserStore {
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            col: mongo.collection(USER_COLLECTION).await?,
        })
    }

    /// Insert a new account.
    ///
    /// The unique email index backstops the caller's existence check:
    /// a racing duplicate signup fails here with a conflict.
    pub async fn create(&self, user: UserDoc) -> Result<(), GroveError> {
        match self.col.insert_one(user).await {
            Ok(()) => Ok(()),
            Err(GroveError::Database(msg)) if msg.contains("E11000") => Err(
                GroveError::Conflict("An account with this email already exists".into()),
            ),
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>, GroveError> {
        self.col.find_one(doc! { "email": email }).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserDoc>, GroveError> {
        self.col.find_one(doc! { "id": id }).await
    }

    /// Full replace by account id
    pub async fn update(&self, user: UserDoc) -> Result<(), GroveError> {
        self.col.replace_one(doc! { "id": &user.id }, user).await
    }

    /// Soft delete by account id
    pub async fn delete(&self, id: &str) -> Result<(), GroveError> {
        self.col.soft_delete(doc! { "id": id }).await?;
        Ok(())
    }
}
