//! Action catalog store

use bson::doc;
use tracing::info;

use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{ActionCategory, ActionDoc, ACTION_COLLECTION};
use crate::types::GroveError;

/// Store handle for the sustainability action catalog
#[derive(Clone)]
pub struct ActionStore {
    col: MongoCollection<ActionDoc>,
}

impl ActionStore {
    pub async fn init(mongo: &MongoClient) -> Result<Self, GroveError> {
        Ok(Self {
            col: mongo.collection(ACTION_COLLECTION).await?,
        })
    }

    /// All catalog actions, newest first
    pub async fn list_all(&self) -> Result<Vec<ActionDoc>, GroveError> {
        self.col
            .find_many(doc! {}, Some(doc! { "metadata.created_at": -1 }))
            .await
    }

    pub async fn add(&self, action: ActionDoc) -> Result<(), GroveError> {
        self.col.insert_one(action).await
    }

    /// Soft delete. Submissions referencing the removed action keep
    /// their denormalized title and points.
    pub async fn remove(&self, id: &str) -> Result<(), GroveError> {
        let result = self.col.soft_delete(doc! { "id": id }).await?;
        if result.matched_count == 0 {
            return Err(GroveError::NotFound(format!("No action with id {}", id)));
        }
        Ok(())
    }

    /// Seed the built-in actions into an empty catalog
    pub async fn seed_defaults(&self) -> Result<(), GroveError> {
        if !self.list_all().await?.is_empty() {
            return Ok(());
        }

        for action in default_actions() {
            self.add(action).await?;
        }
        info!("Seeded action catalog with default actions");
        Ok(())
    }
}

/// The catalog every fresh deployment starts with
pub fn default_actions() -> Vec<ActionDoc> {
    vec![
        ActionDoc::new(
            "Use public transportation".into(),
            "Take bus, train, or bike instead of driving alone".into(),
            50,
            ActionCategory::Environmental,
            "🚌".into(),
            true,
        ),
        ActionDoc::new(
            "Volunteer at local community center".into(),
            "Help organize events or assist with programs".into(),
            75,
            ActionCategory::Social,
            "🤝".into(),
            true,
        ),
        ActionDoc::new(
            "Support local businesses".into(),
            "Purchase from small, local shops and restaurants".into(),
            30,
            ActionCategory::Economic,
            "🏪".into(),
            true,
        ),
        ActionDoc::new(
            "Reduce energy consumption".into(),
            "Turn off lights and unplug devices when not in use".into(),
            40,
            ActionCategory::Environmental,
            "💡".into(),
            false,
        ),
        ActionDoc::new(
            "Participate in health screening".into(),
            "Get regular check-ups and health assessments".into(),
            60,
            ActionCategory::Health,
            "🩺".into(),
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actions_are_well_formed() {
        let actions = default_actions();
        assert_eq!(actions.len(), 5);
        for action in &actions {
            assert!(!action.title.is_empty());
            assert!(action.points > 0);
        }
    }

    #[test]
    fn test_default_action_points() {
        let points: Vec<i64> = default_actions().iter().map(|a| a.points).collect();
        assert_eq!(points, vec![50, 75, 30, 40, 60]);
    }
}
