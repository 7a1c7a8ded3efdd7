// src/domain/login/filter.rs
use super::entity::{BlogId, LoginStatus};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

/// Which timestamp column a date range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Login,
    Logout,
    LastSeen,
}

impl DateField {
    /// Accepts the `date_type` values of the list view; anything else is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "last_seen" => Some(Self::LastSeen),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Login => "time_login",
            Self::Logout => "time_logout",
            Self::LastSeen => "time_last_seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub field: DateField,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Filter on the role held at login time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OldRoleFilter {
    SuperAdmin,
    Contains(String),
}

/// Typed form of the list view's query-string filters.
///
/// Text values are matched exactly; `old_role` matches as a substring. The
/// current-role filter is resolved by the caller into `user_ids_in` (or
/// `usernames_in` for super admins) because current roles live in the user
/// directory, not in the login table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRecordFilter {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub browser: Option<String>,
    pub operating_system: Option<String>,
    pub ip_address: Option<String>,
    pub timezone: Option<String>,
    pub country_name: Option<String>,
    pub login_status: Option<LoginStatus>,
    pub usernames_in: Option<Vec<String>>,
    pub user_ids_in: Option<Vec<i64>>,
    pub old_role: Option<OldRoleFilter>,
    pub date_range: Option<DateRange>,
    pub is_super_admin: Option<bool>,
    pub blog_id: Option<BlogId>,
}

impl LoginRecordFilter {
    pub fn for_blog(blog_id: Option<BlogId>) -> Self {
        Self {
            blog_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    UserId,
    Username,
    OldRole,
    TimeLogin,
    TimeLogout,
    Browser,
    OperatingSystem,
    CountryName,
    TimeLastSeen,
    Timezone,
    UserAgent,
    LoginStatus,
    IsSuperAdmin,
    Duration,
    BlogId,
}

impl SortColumn {
    pub const ALWAYS: [SortColumn; 14] = [
        SortColumn::UserId,
        SortColumn::Username,
        SortColumn::OldRole,
        SortColumn::TimeLogin,
        SortColumn::TimeLogout,
        SortColumn::Browser,
        SortColumn::OperatingSystem,
        SortColumn::CountryName,
        SortColumn::TimeLastSeen,
        SortColumn::Timezone,
        SortColumn::UserAgent,
        SortColumn::LoginStatus,
        SortColumn::IsSuperAdmin,
        SortColumn::Duration,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Username => "username",
            Self::OldRole => "old_role",
            Self::TimeLogin => "time_login",
            Self::TimeLogout => "time_logout",
            Self::Browser => "browser",
            Self::OperatingSystem => "operating_system",
            Self::CountryName => "country_name",
            Self::TimeLastSeen => "time_last_seen",
            Self::Timezone => "timezone",
            Self::UserAgent => "user_agent",
            Self::LoginStatus => "login_status",
            Self::IsSuperAdmin => "is_super_admin",
            Self::Duration => "duration",
            Self::BlogId => "blog_id",
        }
    }

    /// Parses an `orderby` value. `blog_id` is only accepted when `network` is set.
    pub fn parse(value: &str, network: bool) -> Option<Self> {
        if network && value == "blog_id" {
            return Some(Self::BlogId);
        }
        Self::ALWAYS.into_iter().find(|col| col.key() == value)
    }

    /// Whether the initial click on the column header sorts descending.
    pub fn initially_desc(&self) -> bool {
        matches!(self, Self::UserId | Self::Username | Self::OldRole)
    }

    /// SQL expression used in ORDER BY; always a fixed string.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            Self::Duration => "(GREATEST(time_logout, time_last_seen) - time_login)",
            other => other.key(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: SortColumn::TimeLogin,
            order: SortOrder::Desc,
        }
    }
}

/// Offset pagination; `per_page == None` means every matching row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: Some(per_page.max(1)),
        }
    }

    pub fn all() -> Self {
        Self {
            page: 1,
            per_page: None,
        }
    }

    pub fn offset(&self) -> i64 {
        match self.per_page {
            Some(per_page) => i64::from(self.page.saturating_sub(1)) * i64::from(per_page),
            None => 0,
        }
    }
}
