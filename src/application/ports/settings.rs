// src/application/ports/settings.rs
use crate::application::ApplicationResult;
use crate::domain::login::PresenceThresholds;
use crate::domain::login::presence::{DEFAULT_IDLE_MINUTES, DEFAULT_ONLINE_MINUTES};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_BLOCK_USER_MESSAGE: &str =
    "You are not allowed to log in to this site. Please contact the network administrator.";

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> ApplicationResult<Option<Value>>;
    async fn put(&self, key: &str, value: Value) -> ApplicationResult<()>;
}

/// Thresholds for the last-seen presence badge, in minutes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicSettings {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub is_status_online: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub is_status_idle: Option<u32>,
}

impl BasicSettings {
    /// Zero or missing values fall back to the defaults.
    pub fn thresholds(&self) -> PresenceThresholds {
        PresenceThresholds {
            online_minutes: self
                .is_status_online
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_ONLINE_MINUTES),
            idle_minutes: self
                .is_status_idle
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_IDLE_MINUTES),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancedSettings {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub block_user: bool,
    #[serde(default = "default_block_message")]
    pub block_user_message: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            block_user: false,
            block_user_message: default_block_message(),
            columns: None,
        }
    }
}

fn default_block_message() -> String {
    DEFAULT_BLOCK_USER_MESSAGE.to_string()
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "yes" | "on"),
        _ => false,
    })
}

/// Typed access to the settings stored under `<prefix>_basics`, `<prefix>_advanced`
/// and `<prefix>_network`.
#[derive(Clone)]
pub struct SettingsReader {
    store: Arc<dyn SettingsStore>,
    prefix: String,
}

impl SettingsReader {
    pub fn new(store: Arc<dyn SettingsStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub async fn basics(&self) -> BasicSettings {
        self.read("basics").await
    }

    pub async fn advanced(&self) -> AdvancedSettings {
        self.read("advanced").await
    }

    pub async fn network(&self) -> NetworkSettings {
        self.read("network").await
    }

    async fn read<T: DeserializeOwned + Default>(&self, section: &str) -> T {
        let key = format!("{}_{section}", self.prefix);
        match self.store.get(&key).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(%key, error = %err, "malformed settings entry, using defaults");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(err) => {
                tracing::error!(%key, error = %err, "failed to read settings, using defaults");
                T::default()
            }
        }
    }
}
