use crate::domain::login::BlogId;
use crate::domain::user::{Capability, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthTokenDto {
    pub token: String,
    #[serde(with = "serde_time")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    /// Site the caller is acting on.
    pub blog_id: BlogId,
    /// The caller's preferred timezone for displayed times.
    pub timezone: Option<String>,
    pub capabilities: HashSet<Capability>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }

    pub fn can_manage_network(&self) -> bool {
        self.has_capability("network", "manage")
    }
}

/// Which rows a list-table request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Site(BlogId),
    Network,
}

impl ListScope {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network)
    }

    pub fn blog_id(&self) -> Option<BlogId> {
        match self {
            Self::Site(id) => Some(*id),
            Self::Network => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub username: String,
    pub blog_id: BlogId,
    pub timezone: Option<String>,
    pub capabilities: HashSet<Capability>,
}

impl TokenSubject {
    pub fn from_authenticated(auth: &AuthenticatedUser) -> Self {
        Self {
            user_id: auth.id,
            username: auth.username.clone(),
            blog_id: auth.blog_id,
            timezone: auth.timezone.clone(),
            capabilities: auth.capabilities.clone(),
        }
    }
}
