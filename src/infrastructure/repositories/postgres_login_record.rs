// src/infrastructure/repositories/postgres_login_record.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::login::{
    BlogId, GeoFields, LoginRecord, LoginRecordFilter, LoginRecordId, LoginRecordRepository,
    LoginStatus, NewLoginRecord, OldRoleFilter, PageRequest, Sort,
};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_COLUMNS: &str = "SELECT id, user_id, session_token, username, time_login, time_logout, \
     time_last_seen, ip_address, browser, browser_version, operating_system, country_name, \
     country_code, timezone, old_role, user_agent, login_status, is_super_admin, blog_id \
     FROM login_history WHERE 1=1";

#[derive(Clone)]
pub struct PostgresLoginRecordRepository {
    pool: PgPool,
}

impl PostgresLoginRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends ` AND ...` clauses for every set filter. Values are always bound.
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &LoginRecordFilter) {
        if let Some(blog_id) = filter.blog_id {
            builder.push(" AND blog_id = ").push_bind(i64::from(blog_id));
        }
        if let Some(user_id) = filter.user_id {
            builder.push(" AND user_id = ").push_bind(i64::from(user_id));
        }

        let equals = [
            ("username", &filter.username),
            ("browser", &filter.browser),
            ("operating_system", &filter.operating_system),
            ("ip_address", &filter.ip_address),
            ("timezone", &filter.timezone),
            ("country_name", &filter.country_name),
        ];
        for (column, value) in equals {
            if let Some(value) = value {
                builder
                    .push(format!(" AND {column} = "))
                    .push_bind(value.clone());
            }
        }

        if let Some(status) = filter.login_status {
            builder
                .push(" AND login_status = ")
                .push_bind(status.as_str());
        }
        if let Some(usernames) = &filter.usernames_in {
            builder
                .push(" AND username = ANY(")
                .push_bind(usernames.clone())
                .push(")");
        }
        if let Some(ids) = &filter.user_ids_in {
            builder
                .push(" AND user_id = ANY(")
                .push_bind(ids.clone())
                .push(")");
        }

        match &filter.old_role {
            Some(OldRoleFilter::SuperAdmin) => {
                builder.push(" AND is_super_admin = TRUE");
            }
            Some(OldRoleFilter::Contains(role)) => {
                builder
                    .push(" AND old_role LIKE ")
                    .push_bind(format!("%{}%", escape_like(role)));
            }
            None => {}
        }

        if let Some(range) = &filter.date_range {
            let column = range.field.column();
            if let Some(from) = range.from {
                builder
                    .push(format!(" AND {column} >= "))
                    .push_bind(from);
            }
            if let Some(to) = range.to {
                builder.push(format!(" AND {column} <= ")).push_bind(to);
            }
        }

        if let Some(is_super_admin) = filter.is_super_admin {
            builder
                .push(" AND is_super_admin = ")
                .push_bind(is_super_admin);
        }
    }
}

pub(super) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, FromRow)]
struct LoginRecordRow {
    id: i64,
    user_id: Option<i64>,
    session_token: String,
    username: String,
    time_login: DateTime<Utc>,
    time_logout: Option<DateTime<Utc>>,
    time_last_seen: DateTime<Utc>,
    ip_address: Option<String>,
    browser: Option<String>,
    browser_version: Option<String>,
    operating_system: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    timezone: Option<String>,
    old_role: Option<String>,
    user_agent: Option<String>,
    login_status: String,
    is_super_admin: bool,
    blog_id: i64,
}

impl TryFrom<LoginRecordRow> for LoginRecord {
    type Error = DomainError;

    fn try_from(row: LoginRecordRow) -> Result<Self, Self::Error> {
        Ok(LoginRecord {
            id: LoginRecordId::new(row.id)?,
            // rows of deleted accounts keep their id; zero means "no user"
            user_id: row.user_id.filter(|id| *id > 0).map(UserId),
            session_token: row.session_token,
            username: row.username,
            time_login: row.time_login,
            time_logout: row.time_logout,
            time_last_seen: row.time_last_seen,
            ip_address: row.ip_address,
            browser: row.browser,
            browser_version: row.browser_version,
            operating_system: row.operating_system,
            old_role: row.old_role,
            user_agent: row.user_agent,
            login_status: row.login_status.parse::<LoginStatus>()?,
            is_super_admin: row.is_super_admin,
            blog_id: BlogId(row.blog_id),
            geo: GeoFields {
                timezone: row.timezone,
                country_name: row.country_name,
                country_code: row.country_code,
            },
        })
    }
}

#[async_trait]
impl LoginRecordRepository for PostgresLoginRecordRepository {
    async fn insert(&self, record: NewLoginRecord) -> DomainResult<LoginRecordId> {
        let NewLoginRecord {
            user_id,
            session_token,
            username,
            time_login,
            ip_address,
            browser,
            browser_version,
            operating_system,
            old_role,
            user_agent,
            login_status,
            is_super_admin,
            blog_id,
            geo,
        } = record;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO login_history (user_id, session_token, username, time_login, time_last_seen,
                 ip_address, browser, browser_version, operating_system, country_name, country_code,
                 timezone, old_role, user_agent, login_status, is_super_admin, blog_id)
             VALUES ($1, $2, $3, $4, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING id",
        )
        .bind(user_id.map(i64::from))
        .bind(session_token)
        .bind(username)
        .bind(time_login)
        .bind(ip_address)
        .bind(browser)
        .bind(browser_version)
        .bind(operating_system)
        .bind(geo.country_name)
        .bind(geo.country_code)
        .bind(geo.timezone)
        .bind(old_role)
        .bind(user_agent)
        .bind(login_status.as_str())
        .bind(is_super_admin)
        .bind(i64::from(blog_id))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        LoginRecordId::new(id)
    }

    async fn touch_last_seen(
        &self,
        id: LoginRecordId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        sqlx::query("UPDATE login_history SET time_last_seen = $1 WHERE id = $2 AND user_id = $3")
            .bind(at)
            .bind(i64::from(id))
            .bind(i64::from(user_id))
            .execute(&self.pool)
            .await
            .map(|res| res.rows_affected())
            .map_err(map_sqlx)
    }

    async fn close_session(
        &self,
        id: LoginRecordId,
        status: LoginStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        sqlx::query(
            "UPDATE login_history SET time_logout = $1, time_last_seen = $1, login_status = $2
             WHERE id = $3",
        )
        .bind(at)
        .bind(status.as_str())
        .bind(i64::from(id))
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected())
        .map_err(map_sqlx)
    }

    async fn count(&self, filter: &LoginRecordFilter) -> DomainResult<u64> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(1) FROM login_history WHERE 1=1");
        Self::push_filters(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map(|count| count.max(0) as u64)
            .map_err(map_sqlx)
    }

    async fn list(
        &self,
        filter: &LoginRecordFilter,
        sort: Sort,
        page: PageRequest,
    ) -> DomainResult<Vec<LoginRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        Self::push_filters(&mut builder, filter);

        builder.push(format!(
            " ORDER BY {} {} NULLS LAST, id DESC",
            sort.column.sql_expr(),
            sort.order.sql()
        ));
        if let Some(per_page) = page.per_page {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(per_page))
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let rows = builder
            .build_query_as::<LoginRecordRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(LoginRecord::try_from).collect()
    }

    async fn delete_by_ids(
        &self,
        ids: &[LoginRecordId],
        blog_id: Option<BlogId>,
    ) -> DomainResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = ids.iter().copied().map(i64::from).collect();

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("DELETE FROM login_history WHERE id = ANY(");
        builder.push_bind(ids).push(")");
        if let Some(blog_id) = blog_id {
            builder.push(" AND blog_id = ").push_bind(i64::from(blog_id));
        }

        builder
            .build()
            .execute(&self.pool)
            .await
            .map(|res| res.rows_affected())
            .map_err(map_sqlx)
    }

    async fn delete_all(&self, blog_id: Option<BlogId>) -> DomainResult<u64> {
        match blog_id {
            Some(blog_id) => sqlx::query("DELETE FROM login_history WHERE blog_id = $1")
                .bind(i64::from(blog_id))
                .execute(&self.pool)
                .await
                .map(|res| res.rows_affected())
                .map_err(map_sqlx),
            None => {
                let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM login_history")
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_sqlx)?;
                sqlx::query("TRUNCATE TABLE login_history")
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx)?;
                tx.commit().await.map_err(map_sqlx)?;
                Ok(u64::try_from(total).unwrap_or_default())
            }
        }
    }
}
