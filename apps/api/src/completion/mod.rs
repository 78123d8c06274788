// Completion state: per-user checklist progress that survives re-renders and restarts.
// The core talks to `CompletionStateStore`; backends implement `DocumentStore`.

pub mod memory;
pub mod postgres;
pub mod redis_store;
pub mod store;

pub use memory::{InMemoryDocumentStore, NoopDocumentStore};
pub use postgres::PgDocumentStore;
pub use redis_store::RedisDocumentStore;
pub use store::{CompletionRecord, CompletionStateStore, DocumentStore, StoreError};
