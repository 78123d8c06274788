use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::completion::{CompletionRecord, DocumentStore, StoreError};

/// Process-local document store. Used for local runs and tests.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, CompletionRecord>>,
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, user_id: &str) -> Result<Option<CompletionRecord>, StoreError> {
        Ok(self.documents.read().await.get(user_id).cloned())
    }

    async fn set_document(
        &self,
        user_id: &str,
        record: &CompletionRecord,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let doc = documents.entry(user_id.to_string()).or_default();
        if !merge {
            doc.states.clear();
        }
        doc.states
            .extend(record.states.iter().map(|(k, v)| (k.clone(), *v)));
        doc.updated_at = Some(Utc::now());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Persistence disabled: nothing is ever stored, every load is empty.
pub struct NoopDocumentStore;

#[async_trait]
impl DocumentStore for NoopDocumentStore {
    async fn get_document(&self, _user_id: &str) -> Result<Option<CompletionRecord>, StoreError> {
        Ok(None)
    }

    async fn set_document(
        &self,
        _user_id: &str,
        _record: &CompletionRecord,
        _merge: bool,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
