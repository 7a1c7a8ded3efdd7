// src/infrastructure/security/session_store.rs
use super::session_key;
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::session::{SessionPointer, SessionPointerStore};
use crate::application::ports::time::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

struct Entry {
    pointer: SessionPointer,
    /// `None` when the TTL is too large to represent.
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Process-local pointer store, used when no Redis is configured.
///
/// Pointers expire after `ttl_secs` like their Redis counterparts; expired
/// entries read as missing and are pruned on the next write.
pub struct InMemorySessionPointerStore {
    pointers: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionPointerStore {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let ttl = i64::try_from(ttl_secs.max(1))
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            pointers: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn guard(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.pointers
            .lock()
            .map_err(|_| ApplicationError::infrastructure("session pointer store poisoned"))
    }

    #[cfg(test)]
    fn entry_count(&self) -> ApplicationResult<usize> {
        Ok(self.guard()?.len())
    }
}

#[async_trait]
impl SessionPointerStore for InMemorySessionPointerStore {
    async fn set(&self, session_token: &str, pointer: SessionPointer) -> ApplicationResult<()> {
        let now = self.clock.now();
        let mut pointers = self.guard()?;
        pointers.retain(|_, entry| entry.is_live(now));
        pointers.insert(
            session_key(session_token),
            Entry {
                pointer,
                expires_at: now.checked_add_signed(self.ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, session_token: &str) -> ApplicationResult<Option<SessionPointer>> {
        let now = self.clock.now();
        Ok(self
            .guard()?
            .get(&session_key(session_token))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.pointer))
    }

    async fn remove(&self, session_token: &str) -> ApplicationResult<()> {
        self.guard()?.remove(&session_key(session_token));
        Ok(())
    }
}
