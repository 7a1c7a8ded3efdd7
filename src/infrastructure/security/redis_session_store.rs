// src/infrastructure/security/redis_session_store.rs
use super::session_key;
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::session::{SessionPointer, SessionPointerStore};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;

const KEY_PREFIX: &str = "login_history:session:";

/// Pointer store shared by every instance of the service. Entries expire after
/// `ttl_secs` so abandoned sessions do not accumulate.
#[derive(Clone)]
pub struct RedisSessionPointerStore {
    pool: Pool,
    ttl_secs: u64,
}

impl RedisSessionPointerStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str, ttl_secs: u64) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            pool,
            ttl_secs: ttl_secs.max(1),
        })
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    fn key(session_token: &str) -> String {
        format!("{KEY_PREFIX}{}", session_key(session_token))
    }
}

#[async_trait]
impl SessionPointerStore for RedisSessionPointerStore {
    async fn set(&self, session_token: &str, pointer: SessionPointer) -> ApplicationResult<()> {
        let value = serde_json::to_string(&pointer)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(session_token), value, self.ttl_secs)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn get(&self, session_token: &str) -> ApplicationResult<Option<SessionPointer>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(Self::key(session_token))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(pointer) => Ok(Some(pointer)),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable session pointer");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn remove(&self, session_token: &str) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(Self::key(session_token))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }
}
