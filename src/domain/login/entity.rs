// src/domain/login/entity.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoginRecordId(pub i64);

impl LoginRecordId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("login record id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<LoginRecordId> for i64 {
    fn from(value: LoginRecordId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlogId(pub i64);

impl BlogId {
    pub const MAIN: BlogId = BlogId(1);

    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("blog id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<BlogId> for i64 {
    fn from(value: BlogId) -> Self {
        value.0
    }
}

/// Outcome of an authentication attempt or of a session end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Login,
    Fail,
    Logout,
    /// Saved when a user is denied on a site of the network they do not belong to.
    Block,
}

impl LoginStatus {
    pub const ALL: [LoginStatus; 4] = [
        LoginStatus::Login,
        LoginStatus::Fail,
        LoginStatus::Logout,
        LoginStatus::Block,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Login => "login",
            LoginStatus::Fail => "fail",
            LoginStatus::Logout => "logout",
            LoginStatus::Block => "block",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoginStatus::Login => "Login",
            LoginStatus::Fail => "Fail",
            LoginStatus::Logout => "Logout",
            LoginStatus::Block => "Block",
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(LoginStatus::Login),
            "fail" => Ok(LoginStatus::Fail),
            "logout" => Ok(LoginStatus::Logout),
            "block" => Ok(LoginStatus::Block),
            other => Err(DomainError::Validation(format!("unknown login status: {other}"))),
        }
    }
}

/// Geo fields attached to a record when the lookup succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoFields {
    pub timezone: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub id: LoginRecordId,
    pub user_id: Option<UserId>,
    pub session_token: String,
    pub username: String,
    pub time_login: DateTime<Utc>,
    pub time_logout: Option<DateTime<Utc>>,
    pub time_last_seen: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub operating_system: Option<String>,
    pub old_role: Option<String>,
    pub user_agent: Option<String>,
    pub login_status: LoginStatus,
    pub is_super_admin: bool,
    pub blog_id: BlogId,
    pub geo: GeoFields,
}

impl LoginRecord {
    /// The later of logout and last-seen; the end of the session as far as we know.
    pub fn last_activity(&self) -> DateTime<Utc> {
        match self.time_logout {
            Some(logout) if logout > self.time_last_seen => logout,
            _ => self.time_last_seen,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLoginRecord {
    pub user_id: Option<UserId>,
    pub session_token: String,
    pub username: String,
    pub time_login: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub operating_system: Option<String>,
    pub old_role: Option<String>,
    pub user_agent: Option<String>,
    pub login_status: LoginStatus,
    pub is_super_admin: bool,
    pub blog_id: BlogId,
    pub geo: GeoFields,
}
