// tests/support/mocks/repos.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use login_history::domain::errors::{DomainError, DomainResult};
use login_history::domain::login::{
    BlogId, DateField, LoginRecord, LoginRecordFilter, LoginRecordId, LoginRecordRepository,
    LoginStatus, NewLoginRecord, OldRoleFilter, PageRequest, Sort, SortColumn, SortOrder,
};
use login_history::domain::user::UserId;
use std::cmp::Ordering;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};

/// Login table kept in memory. Filtering and ordering mirror the SQL repository.
#[derive(Debug)]
pub struct InMemoryLoginRepo {
    rows: Mutex<Vec<LoginRecord>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl Default for InMemoryLoginRepo {
    fn default() -> Self {
        Self {
            rows: Mutex::default(),
            next_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl InMemoryLoginRepo {
    /// Stores a ready-made record, keeping its id.
    pub fn seed(&self, record: LoginRecord) {
        self.next_id
            .fetch_max(record.id.0 + 1, AtomicOrdering::SeqCst);
        self.rows.lock().unwrap().push(record);
    }

    pub fn seed_all(&self, records: impl IntoIterator<Item = LoginRecord>) {
        for record in records {
            self.seed(record);
        }
    }

    /// Makes every following insert fail like a lost database.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, AtomicOrdering::SeqCst);
    }

    pub fn get(&self, id: LoginRecordId) -> Option<LoginRecord> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.rows.lock().unwrap().iter().map(|r| r.id.0).collect();
        ids.sort_unstable();
        ids
    }
}

fn matches(filter: &LoginRecordFilter, r: &LoginRecord) -> bool {
    let eq = |want: &Option<String>, have: &Option<String>| {
        want.as_ref().is_none_or(|w| have.as_deref() == Some(w.as_str()))
    };

    filter.user_id.is_none_or(|id| r.user_id == Some(id))
        && filter.username.as_ref().is_none_or(|u| &r.username == u)
        && eq(&filter.browser, &r.browser)
        && eq(&filter.operating_system, &r.operating_system)
        && eq(&filter.ip_address, &r.ip_address)
        && eq(&filter.timezone, &r.geo.timezone)
        && eq(&filter.country_name, &r.geo.country_name)
        && filter.login_status.is_none_or(|s| r.login_status == s)
        && filter
            .usernames_in
            .as_ref()
            .is_none_or(|names| names.contains(&r.username))
        && filter
            .user_ids_in
            .as_ref()
            .is_none_or(|ids| r.user_id.is_some_and(|id| ids.contains(&id.0)))
        && filter.old_role.as_ref().is_none_or(|role| match role {
            OldRoleFilter::SuperAdmin => r.is_super_admin,
            OldRoleFilter::Contains(part) => r
                .old_role
                .as_deref()
                .is_some_and(|old| old.contains(part.as_str())),
        })
        && filter.date_range.as_ref().is_none_or(|range| {
            let value = match range.field {
                DateField::Login => Some(r.time_login),
                DateField::Logout => r.time_logout,
                DateField::LastSeen => Some(r.time_last_seen),
            };
            value.is_some_and(|v| {
                range.from.is_none_or(|from| v >= from) && range.to.is_none_or(|to| v <= to)
            })
        })
        && filter.is_super_admin.is_none_or(|flag| r.is_super_admin == flag)
        && filter.blog_id.is_none_or(|blog| r.blog_id == blog)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Int(i64),
    Text(String),
    Time(DateTime<Utc>),
}

fn sort_key(r: &LoginRecord, column: SortColumn) -> Option<SortKey> {
    let text = |v: &Option<String>| v.clone().map(SortKey::Text);
    match column {
        SortColumn::UserId => r.user_id.map(|id| SortKey::Int(id.0)),
        SortColumn::Username => Some(SortKey::Text(r.username.clone())),
        SortColumn::OldRole => text(&r.old_role),
        SortColumn::TimeLogin => Some(SortKey::Time(r.time_login)),
        SortColumn::TimeLogout => r.time_logout.map(SortKey::Time),
        SortColumn::Browser => text(&r.browser),
        SortColumn::OperatingSystem => text(&r.operating_system),
        SortColumn::CountryName => text(&r.geo.country_name),
        SortColumn::TimeLastSeen => Some(SortKey::Time(r.time_last_seen)),
        SortColumn::Timezone => text(&r.geo.timezone),
        SortColumn::UserAgent => text(&r.user_agent),
        SortColumn::LoginStatus => Some(SortKey::Text(r.login_status.as_str().to_string())),
        SortColumn::IsSuperAdmin => Some(SortKey::Int(i64::from(r.is_super_admin))),
        SortColumn::Duration => Some(SortKey::Int((r.last_activity() - r.time_login).num_seconds())),
        SortColumn::BlogId => Some(SortKey::Int(r.blog_id.0)),
    }
}

fn compare(a: &LoginRecord, b: &LoginRecord, sort: Sort) -> Ordering {
    let primary = match (sort_key(a, sort.column), sort_key(b, sort.column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match sort.order {
            SortOrder::Asc => x.cmp(&y),
            SortOrder::Desc => y.cmp(&x),
        },
    };
    primary.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl LoginRecordRepository for InMemoryLoginRepo {
    async fn insert(&self, record: NewLoginRecord) -> DomainResult<LoginRecordId> {
        if self.fail_writes.load(AtomicOrdering::SeqCst) {
            return Err(DomainError::Persistence("database unavailable".into()));
        }
        let id = LoginRecordId(self.next_id.fetch_add(1, AtomicOrdering::SeqCst));
        self.rows.lock().unwrap().push(LoginRecord {
            id,
            user_id: record.user_id,
            session_token: record.session_token,
            username: record.username,
            time_login: record.time_login,
            time_logout: None,
            time_last_seen: record.time_login,
            ip_address: record.ip_address,
            browser: record.browser,
            browser_version: record.browser_version,
            operating_system: record.operating_system,
            old_role: record.old_role,
            user_agent: record.user_agent,
            login_status: record.login_status,
            is_super_admin: record.is_super_admin,
            blog_id: record.blog_id,
            geo: record.geo,
        });
        Ok(id)
    }

    async fn touch_last_seen(
        &self,
        id: LoginRecordId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for row in rows
            .iter_mut()
            .filter(|r| r.id == id && r.user_id == Some(user_id))
        {
            row.time_last_seen = at;
            updated += 1;
        }
        Ok(updated)
    }

    async fn close_session(
        &self,
        id: LoginRecordId,
        status: LoginStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for row in rows.iter_mut().filter(|r| r.id == id) {
            row.time_logout = Some(at);
            row.time_last_seen = at;
            row.login_status = status;
            updated += 1;
        }
        Ok(updated)
    }

    async fn count(&self, filter: &LoginRecordFilter) -> DomainResult<u64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| matches(filter, r)).count() as u64)
    }

    async fn list(
        &self,
        filter: &LoginRecordFilter,
        sort: Sort,
        page: PageRequest,
    ) -> DomainResult<Vec<LoginRecord>> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<LoginRecord> =
            rows.iter().filter(|r| matches(filter, r)).cloned().collect();
        matching.sort_by(|a, b| compare(a, b, sort));

        let offset = usize::try_from(page.offset()).unwrap_or(0);
        let limit = page
            .per_page
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_by_ids(
        &self,
        ids: &[LoginRecordId],
        blog_id: Option<BlogId>,
    ) -> DomainResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(ids.contains(&r.id) && blog_id.is_none_or(|b| r.blog_id == b)));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all(&self, blog_id: Option<BlogId>) -> DomainResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| blog_id.is_some_and(|b| r.blog_id != b));
        Ok((before - rows.len()) as u64)
    }
}
