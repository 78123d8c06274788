use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::context::SessionContext;

pub const DEFAULT_IDLE_TTL_SECS: i64 = 60 * 60;

struct Entry {
    session: SessionContext,
    /// Unix millis of the last read or update. Bumped under the shared lock.
    last_seen: AtomicI64,
}

impl Entry {
    fn touch(&self) {
        self.last_seen
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_at(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.last_seen.load(Ordering::Relaxed)
    }
}

/// Live sessions keyed by session id. Sessions never share mutable state.
///
/// A session untouched for longer than the idle TTL is evicted, either on the
/// next `insert` or by `run_sweeper`.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_IDLE_TTL_SECS))
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn insert(&self, session: SessionContext) -> Uuid {
        let id = session.session_id;
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let evicted = evict_expired(&mut sessions, self.idle_ttl, now);
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions");
        }
        sessions.insert(
            id,
            Entry {
                session,
                last_seen: AtomicI64::new(now.timestamp_millis()),
            },
        );
        id
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionContext> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|entry| entry.session)
    }

    /// Runs `f` against a shared borrow of the session.
    pub async fn read<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&SessionContext) -> R,
    ) -> Result<R, AppError> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&id).ok_or_else(|| not_found(id))?;
        entry.touch();
        Ok(f(&entry.session))
    }

    /// Runs `f` against an exclusive borrow of the session.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionContext) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.touch();
        f(&mut entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for longer than the TTL as of `now`.
    pub async fn evict_idle_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.idle_ttl, now)
    }

    /// Periodically evicts idle sessions. Runs until the runtime shuts down.
    pub async fn run_sweeper(self: Arc<Self>, every: std::time::Duration) {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = self.evict_idle_at(Utc::now()).await;
            if evicted > 0 {
                info!(
                    "Evicted {evicted} idle sessions ({} still live)",
                    self.len().await
                );
            }
        }
    }
}

fn evict_expired(sessions: &mut HashMap<Uuid, Entry>, ttl: Duration, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    let ttl_ms = ttl.num_milliseconds();
    sessions.retain(|_, entry| entry.idle_at(now) <= ttl_ms);
    before - sessions.len()
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
