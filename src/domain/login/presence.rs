// src/domain/login/presence.rs
use super::entity::LoginStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_ONLINE_MINUTES: u32 = 2;
pub const DEFAULT_IDLE_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceThresholds {
    pub online_minutes: u32,
    pub idle_minutes: u32,
}

impl Default for PresenceThresholds {
    fn default() -> Self {
        Self {
            online_minutes: DEFAULT_ONLINE_MINUTES,
            idle_minutes: DEFAULT_IDLE_MINUTES,
        }
    }
}

impl PresenceThresholds {
    /// Only sessions still in `login` state can be online or idle.
    pub fn classify(
        &self,
        status: LoginStatus,
        last_seen: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> PresenceStatus {
        if status != LoginStatus::Login {
            return PresenceStatus::Offline;
        }

        #[allow(clippy::cast_precision_loss)]
        let minutes = (now - last_seen).num_seconds() as f64 / 60.0;

        if minutes <= f64::from(self.online_minutes) {
            PresenceStatus::Online
        } else if minutes <= f64::from(self.idle_minutes) {
            PresenceStatus::Idle
        } else {
            PresenceStatus::Offline
        }
    }
}
