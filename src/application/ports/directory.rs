// src/application/ports/directory.rs
use crate::application::ApplicationResult;
use crate::domain::login::BlogId;
use crate::domain::user::{UserId, UserSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read access to the accounts the tracked logins belong to.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: UserId) -> ApplicationResult<Option<UserSnapshot>>;

    /// Current roles keyed by user id; users without roles are absent.
    async fn current_roles(&self, ids: &[UserId]) -> ApplicationResult<HashMap<UserId, Vec<String>>>;

    async fn super_admin_usernames(&self) -> ApplicationResult<Vec<String>>;

    /// Users with a current role whose name contains `role`.
    async fn user_ids_with_role(&self, role: &str) -> ApplicationResult<Vec<i64>>;

    async fn is_member_of_blog(&self, id: UserId, blog_id: BlogId) -> ApplicationResult<bool>;
}
