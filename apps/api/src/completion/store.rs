//! Completion state store — load/save of label → completed flags per user.
//!
//! The backing document store is pluggable (`DocumentStore`), swapped at startup
//! via `COMPLETION_STORE`. One document per user; the `states` field holds the
//! label map. Saves always merge, so labels from earlier submissions are kept.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// One user's persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub states: BTreeMap<String, bool>,
    /// Set by backends that track write time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CompletionRecord {
    pub fn new(states: BTreeMap<String, bool>) -> Self {
        Self {
            states,
            updated_at: None,
        }
    }
}

/// The persistence collaborator: a key-value document store keyed by user id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `None` when the user has never saved anything.
    async fn get_document(&self, user_id: &str) -> Result<Option<CompletionRecord>, StoreError>;

    /// With `merge`, keys absent from `record` are left untouched.
    /// Without it, the stored document is replaced.
    async fn set_document(
        &self,
        user_id: &str,
        record: &CompletionRecord,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Checklist completion persistence used by the session layer.
#[derive(Clone)]
pub struct CompletionStateStore {
    documents: Arc<dyn DocumentStore>,
}

impl CompletionStateStore {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub fn backend_name(&self) -> &'static str {
        self.documents.backend_name()
    }

    /// Empty map when no record exists.
    pub async fn load(&self, user_id: &str) -> Result<BTreeMap<String, bool>, StoreError> {
        let record = self.documents.get_document(user_id).await?;
        let states = record.map(|r| r.states).unwrap_or_default();
        debug!("Loaded {} completion flags for user {user_id}", states.len());
        Ok(states)
    }

    /// Merge-writes `states`; labels are stored trimmed.
    pub async fn save(&self, user_id: &str, states: &BTreeMap<String, bool>) -> Result<(), StoreError> {
        let states: BTreeMap<String, bool> = states
            .iter()
            .map(|(label, done)| (label.trim().to_string(), *done))
            .filter(|(label, _)| !label.is_empty())
            .collect();
        if states.is_empty() {
            return Ok(());
        }
        self.documents
            .set_document(user_id, &CompletionRecord::new(states), true)
            .await?;
        debug!("Saved completion flags for user {user_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::memory::{InMemoryDocumentStore, NoopDocumentStore};

    fn store() -> CompletionStateStore {
        CompletionStateStore::new(Arc::new(InMemoryDocumentStore::default()))
    }

    fn states(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = store();
        store.save("ada", &states(&[("Task A", true)])).await.unwrap();
        let loaded = store.load("ada").await.unwrap();
        assert_eq!(loaded.get("Task A"), Some(&true));
    }

    #[tokio::test]
    async fn test_unknown_user_loads_empty() {
        assert!(store().load("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_merges_with_existing_labels() {
        let store = store();
        store
            .save("ada", &states(&[("Task A", true), ("Task B", false)]))
            .await
            .unwrap();
        store
            .save("ada", &states(&[("Task B", true), ("Task C", true)]))
            .await
            .unwrap();
        assert_eq!(
            store.load("ada").await.unwrap(),
            states(&[("Task A", true), ("Task B", true), ("Task C", true)])
        );
    }

    #[tokio::test]
    async fn test_users_are_partitioned() {
        let store = store();
        store.save("ada", &states(&[("Task A", true)])).await.unwrap();
        assert!(store.load("grace").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_labels_are_trimmed_on_save() {
        let store = store();
        store.save("ada", &states(&[("  Task A ", true), ("   ", true)])).await.unwrap();
        assert_eq!(store.load("ada").await.unwrap(), states(&[("Task A", true)]));
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let store = store();
        let flags = states(&[("Task A", true)]);
        store.save("ada", &flags).await.unwrap();
        store.save("ada", &flags).await.unwrap();
        assert_eq!(store.load("ada").await.unwrap(), flags);
    }

    #[tokio::test]
    async fn test_noop_backend_never_remembers() {
        let store = CompletionStateStore::new(Arc::new(NoopDocumentStore));
        store.save("ada", &states(&[("Task A", true)])).await.unwrap();
        assert!(store.load("ada").await.unwrap().is_empty());
        assert_eq!(store.backend_name(), "none");
    }
}
