// src/infrastructure/repositories/postgres_user_directory.rs
use super::map_sqlx;
use super::postgres_login_record::escape_like;
use crate::application::{ApplicationResult, ports::directory::UserDirectory};
use crate::domain::errors::DomainError;
use crate::domain::login::BlogId;
use crate::domain::user::{UserId, UserSnapshot};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    roles: Vec<String>,
    is_super_admin: bool,
}

impl TryFrom<UserRow> for UserSnapshot {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserSnapshot {
            id: UserId::new(row.id)?,
            username: row.username,
            roles: row.roles,
            is_super_admin: row.is_super_admin,
        })
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: UserId) -> ApplicationResult<Option<UserSnapshot>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, roles, is_super_admin FROM users WHERE id = $1",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(UserSnapshot::try_from).transpose()?)
    }

    async fn current_roles(&self, ids: &[UserId]) -> ApplicationResult<HashMap<UserId, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i64> = ids.iter().copied().map(i64::from).collect();
        let rows = sqlx::query_as::<_, (i64, Vec<String>)>(
            "SELECT id, roles FROM users WHERE id = ANY($1) AND cardinality(roles) > 0",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(id, roles)| (UserId(id), roles))
            .collect())
    }

    async fn super_admin_usernames(&self) -> ApplicationResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT username FROM users WHERE is_super_admin ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(names)
    }

    async fn user_ids_with_role(&self, role: &str) -> ApplicationResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users \
             WHERE EXISTS (SELECT 1 FROM unnest(roles) AS r WHERE r LIKE $1) \
             ORDER BY id",
        )
        .bind(format!("%{}%", escape_like(role)))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(ids)
    }

    async fn is_member_of_blog(&self, id: UserId, blog_id: BlogId) -> ApplicationResult<bool> {
        let member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM site_members WHERE user_id = $1 AND blog_id = $2)",
        )
        .bind(i64::from(id))
        .bind(i64::from(blog_id))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(member)
    }
}
