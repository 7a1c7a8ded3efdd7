// src/domain/login/repository.rs
use super::entity::{BlogId, LoginRecord, LoginRecordId, LoginStatus, NewLoginRecord};
use super::filter::{LoginRecordFilter, PageRequest, Sort};
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait LoginRecordRepository: Send + Sync {
    async fn insert(&self, record: NewLoginRecord) -> DomainResult<LoginRecordId>;

    /// Sets `time_last_seen` on the row matching both `id` and `user_id`.
    async fn touch_last_seen(
        &self,
        id: LoginRecordId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> DomainResult<u64>;

    /// Closes a session: sets logout and last-seen to `at` and stores `status`.
    async fn close_session(
        &self,
        id: LoginRecordId,
        status: LoginStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<u64>;

    async fn count(&self, filter: &LoginRecordFilter) -> DomainResult<u64>;

    async fn list(
        &self,
        filter: &LoginRecordFilter,
        sort: Sort,
        page: PageRequest,
    ) -> DomainResult<Vec<LoginRecord>>;

    /// Deletes the given rows, restricted to `blog_id` when one is given.
    async fn delete_by_ids(
        &self,
        ids: &[LoginRecordId],
        blog_id: Option<BlogId>,
    ) -> DomainResult<u64>;

    /// Deletes every row of a site, or the whole table when `blog_id` is `None`.
    async fn delete_all(&self, blog_id: Option<BlogId>) -> DomainResult<u64>;
}
