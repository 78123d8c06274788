use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::completion::{CompletionRecord, DocumentStore, StoreError};

/// JSONB `||` keeps existing keys and overwrites the ones in the new document.
const MERGE_UPSERT: &str = r#"
    INSERT INTO completion_states (user_id, states, updated_at)
    VALUES ($1, $2, now())
    ON CONFLICT (user_id) DO UPDATE
    SET states = completion_states.states || EXCLUDED.states,
        updated_at = now()
"#;

const REPLACE_UPSERT: &str = r#"
    INSERT INTO completion_states (user_id, states, updated_at)
    VALUES ($1, $2, now())
    ON CONFLICT (user_id) DO UPDATE
    SET states = EXCLUDED.states,
        updated_at = now()
"#;

fn upsert_statement(merge: bool) -> &'static str {
    if merge {
        MERGE_UPSERT
    } else {
        REPLACE_UPSERT
    }
}

#[derive(Debug, FromRow)]
struct CompletionRow {
    states: Json<BTreeMap<String, bool>>,
    updated_at: DateTime<Utc>,
}

/// Postgres-backed store: one `completion_states` row per user.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_document(&self, user_id: &str) -> Result<Option<CompletionRecord>, StoreError> {
        let row: Option<CompletionRow> = sqlx::query_as(
            "SELECT states, updated_at FROM completion_states WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CompletionRecord {
            states: row.states.0,
            updated_at: Some(row.updated_at),
        }))
    }

    async fn set_document(
        &self,
        user_id: &str,
        record: &CompletionRecord,
        merge: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(upsert_statement(merge))
            .bind(user_id)
            .bind(Json(&record.states))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_statement_concatenates_jsonb() {
        assert!(upsert_statement(true).contains("completion_states.states || EXCLUDED.states"));
    }

    #[test]
    fn test_replace_statement_overwrites() {
        let sql = upsert_statement(false);
        assert!(sql.contains("SET states = EXCLUDED.states"));
        assert!(!sql.contains("||"));
    }
}
