// tests/support/builders.rs
use chrono::{DateTime, Duration, Utc};

use super::mocks::fixed_now;
use login_history::domain::login::{BlogId, GeoFields, LoginRecord, LoginRecordId, LoginStatus};
use login_history::domain::user::UserId;

/// A stored login row. Defaults to jane logging in on blog 2 ten minutes ago.
pub struct LoginRecordBuilder {
    record: LoginRecord,
}

impl LoginRecordBuilder {
    pub fn new(id: i64) -> Self {
        let login = fixed_now() - Duration::minutes(10);
        Self {
            record: LoginRecord {
                id: LoginRecordId(id),
                user_id: Some(UserId(5)),
                session_token: format!("session-{id}"),
                username: "jane".into(),
                time_login: login,
                time_logout: None,
                time_last_seen: login,
                ip_address: Some("203.0.113.9".into()),
                browser: Some("Firefox".into()),
                browser_version: Some("121.0".into()),
                operating_system: Some("Linux".into()),
                old_role: Some("editor,author".into()),
                user_agent: Some("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".into()),
                login_status: LoginStatus::Login,
                is_super_admin: false,
                blog_id: BlogId(2),
                geo: GeoFields {
                    timezone: Some("Europe/Berlin".into()),
                    country_name: Some("Germany".into()),
                    country_code: Some("DE".into()),
                },
            },
        }
    }

    pub fn user(mut self, id: i64, username: &str) -> Self {
        self.record.user_id = Some(UserId(id));
        self.record.username = username.into();
        self
    }

    /// A failed attempt: no user, no session.
    pub fn failed(mut self, username: &str) -> Self {
        self.record.user_id = None;
        self.record.username = username.into();
        self.record.session_token = String::new();
        self.record.old_role = None;
        self.record.login_status = LoginStatus::Fail;
        self
    }

    pub fn status(mut self, status: LoginStatus) -> Self {
        self.record.login_status = status;
        self
    }

    pub fn blog(mut self, blog_id: i64) -> Self {
        self.record.blog_id = BlogId(blog_id);
        self
    }

    pub fn old_role(mut self, role: &str) -> Self {
        self.record.old_role = Some(role.into());
        self
    }

    pub fn super_admin(mut self) -> Self {
        self.record.is_super_admin = true;
        self
    }

    /// Moves login (and last-seen) to `at`.
    pub fn logged_in_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.time_login = at;
        self.record.time_last_seen = at;
        self
    }

    pub fn last_seen_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.time_last_seen = at;
        self
    }

    pub fn logged_out_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.time_logout = Some(at);
        self.record.time_last_seen = at;
        self.record.login_status = LoginStatus::Logout;
        self
    }

    pub fn browser(mut self, name: &str) -> Self {
        self.record.browser = Some(name.into());
        self.record.browser_version = None;
        self
    }

    pub fn build(self) -> LoginRecord {
        self.record
    }
}
