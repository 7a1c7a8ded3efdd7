// src/application/ports/session.rs
use crate::application::ApplicationResult;
use crate::domain::login::{BlogId, LoginRecordId};
use crate::domain::user::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Links a live session to the login row it produced and the site it was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPointer {
    pub record_id: i64,
    pub blog_id: i64,
    pub user_id: i64,
}

impl SessionPointer {
    pub fn new(record_id: LoginRecordId, blog_id: BlogId, user_id: UserId) -> Self {
        Self {
            record_id: record_id.into(),
            blog_id: blog_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn record_id(&self) -> LoginRecordId {
        LoginRecordId(self.record_id)
    }

    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }
}

#[async_trait]
pub trait SessionPointerStore: Send + Sync {
    async fn set(&self, session_token: &str, pointer: SessionPointer) -> ApplicationResult<()>;

    async fn get(&self, session_token: &str) -> ApplicationResult<Option<SessionPointer>>;

    /// Removes the pointer; removing a missing pointer is not an error.
    async fn remove(&self, session_token: &str) -> ApplicationResult<()>;
}
