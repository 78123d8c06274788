use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::completion::{CompletionRecord, DocumentStore, StoreError};

const KEY_PREFIX: &str = "advisor:completion";

/// Redis-backed store: one hash per user, field = label, value = "1" / "0".
/// HSET only touches the given fields, which is exactly a merge-write.
#[derive(Clone)]
pub struct RedisDocumentStore {
    client: redis::Client,
}

impl RedisDocumentStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn completion_key(user_id: &str) -> String {
    format!("{KEY_PREFIX}:{user_id}")
}

fn encode_flag(completed: bool) -> &'static str {
    if completed {
        "1"
    } else {
        "0"
    }
}

fn decode_flags(raw: HashMap<String, String>) -> Result<BTreeMap<String, bool>, StoreError> {
    raw.into_iter()
        .map(|(label, value)| match value.as_str() {
            "1" | "true" => Ok((label, true)),
            "0" | "false" => Ok((label, false)),
            other => Err(StoreError::Backend(format!(
                "unexpected completion flag {other:?} for label {label:?}"
            ))),
        })
        .collect()
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    async fn get_document(&self, user_id: &str) -> Result<Option<CompletionRecord>, StoreError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let raw: HashMap<String, String> = con.hgetall(completion_key(user_id)).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompletionRecord::new(decode_flags(raw)?)))
    }

    async fn set_document(
        &self,
        user_id: &str,
        record: &CompletionRecord,
        merge: bool,
    ) -> Result<(), StoreError> {
        let key = completion_key(user_id);
        let fields: Vec<(&str, &str)> = record
            .states
            .iter()
            .map(|(label, done)| (label.as_str(), encode_flag(*done)))
            .collect();

        let mut con = self.client.get_multiplexed_async_connection().await?;
        if merge {
            if fields.is_empty() {
                return Ok(());
            }
            let _: () = con.hset_multiple(&key, fields.as_slice()).await?;
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic().del(&key).ignore();
        if !fields.is_empty() {
            pipe.hset_multiple(&key, fields.as_slice()).ignore();
        }
        let _: () = pipe.query_async(&mut con).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
