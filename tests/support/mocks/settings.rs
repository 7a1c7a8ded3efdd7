// tests/support/mocks/settings.rs
use async_trait::async_trait;
use login_history::application::{ApplicationResult, ports::settings::SettingsStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: Mutex<HashMap<String, Value>>,
}

impl InMemorySettings {
    pub fn with(self, key: &str, value: Value) -> Self {
        self.values.lock().unwrap().insert(key.to_string(), value);
        self
    }
}

#[async_trait]
impl SettingsStore for InMemorySettings {
    async fn get(&self, key: &str) -> ApplicationResult<Option<Value>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> ApplicationResult<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}
