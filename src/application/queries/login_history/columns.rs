// src/application/queries/login_history/columns.rs
use crate::application::dto::{BulkActionDto, ColumnDto, ListScope};
use crate::domain::login::SortColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    UserId,
    Username,
    Role,
    OldRole,
    IpAddress,
    Browser,
    OperatingSystem,
    CountryName,
    CountryCode,
    Timezone,
    Duration,
    TimeLastSeen,
    TimeLogin,
    TimeLogout,
    LoginStatus,
    UserAgent,
    IsSuperAdmin,
    BlogId,
}

/// Default list columns, in display order.
const LIST_COLUMNS: [Column; 15] = [
    Column::UserId,
    Column::Username,
    Column::Role,
    Column::OldRole,
    Column::IpAddress,
    Column::Browser,
    Column::OperatingSystem,
    Column::CountryName,
    Column::Duration,
    Column::TimeLastSeen,
    Column::Timezone,
    Column::TimeLogin,
    Column::TimeLogout,
    Column::UserAgent,
    Column::LoginStatus,
];

const NETWORK_COLUMNS: [Column; 2] = [Column::IsSuperAdmin, Column::BlogId];

const EXPORT_COLUMNS: [Column; 16] = [
    Column::UserId,
    Column::Username,
    Column::Role,
    Column::OldRole,
    Column::IpAddress,
    Column::Browser,
    Column::OperatingSystem,
    Column::CountryName,
    Column::CountryCode,
    Column::Timezone,
    Column::Duration,
    Column::TimeLastSeen,
    Column::TimeLogin,
    Column::TimeLogout,
    Column::LoginStatus,
    Column::UserAgent,
];

const ALL_COLUMNS: [Column; 18] = [
    Column::UserId,
    Column::Username,
    Column::Role,
    Column::OldRole,
    Column::IpAddress,
    Column::Browser,
    Column::OperatingSystem,
    Column::CountryName,
    Column::CountryCode,
    Column::Timezone,
    Column::Duration,
    Column::TimeLastSeen,
    Column::TimeLogin,
    Column::TimeLogout,
    Column::LoginStatus,
    Column::UserAgent,
    Column::IsSuperAdmin,
    Column::BlogId,
];

impl Column {
    pub fn key(&self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Username => "username",
            Self::Role => "role",
            Self::OldRole => "old_role",
            Self::IpAddress => "ip_address",
            Self::Browser => "browser",
            Self::OperatingSystem => "operating_system",
            Self::CountryName => "country_name",
            Self::CountryCode => "country_code",
            Self::Timezone => "timezone",
            Self::Duration => "duration",
            Self::TimeLastSeen => "time_last_seen",
            Self::TimeLogin => "time_login",
            Self::TimeLogout => "time_logout",
            Self::LoginStatus => "login_status",
            Self::UserAgent => "user_agent",
            Self::IsSuperAdmin => "is_super_admin",
            Self::BlogId => "blog_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UserId => "User ID",
            Self::Username => "Username",
            Self::Role => "Current Role",
            Self::OldRole => "Old Role",
            Self::IpAddress => "IP Address",
            Self::Browser => "Browser",
            Self::OperatingSystem => "Operating System",
            Self::CountryName => "Country",
            Self::CountryCode => "Country Code",
            Self::Timezone => "Timezone",
            Self::Duration => "Duration",
            Self::TimeLastSeen => "Last Seen",
            Self::TimeLogin => "Login",
            Self::TimeLogout => "Logout",
            Self::LoginStatus => "Login Status",
            Self::UserAgent => "User Agent",
            Self::IsSuperAdmin => "Super Admin",
            Self::BlogId => "Blog ID",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_COLUMNS.into_iter().find(|c| c.key() == key)
    }

    pub fn network_only(&self) -> bool {
        NETWORK_COLUMNS.contains(self)
    }

    fn sort_column(&self, scope: ListScope) -> Option<SortColumn> {
        SortColumn::parse(self.key(), scope.is_network())
    }

    fn to_dto(self, scope: ListScope) -> ColumnDto {
        let sort = self.sort_column(scope);
        ColumnDto {
            key: self.key().to_string(),
            label: self.label().to_string(),
            sortable: sort.is_some(),
            initially_desc: sort.is_some_and(|s| s.initially_desc()),
        }
    }
}

/// Columns shown in the list. A stored selection wins when it names at least
/// one known column; network-only columns never show in site scope.
pub fn printable_columns(selection: Option<&[String]>, scope: ListScope) -> Vec<Column> {
    let allowed = |c: &Column| scope.is_network() || !c.network_only();

    let selected: Vec<Column> = selection
        .unwrap_or_default()
        .iter()
        .filter_map(|key| Column::from_key(key))
        .filter(allowed)
        .collect();

    if !selected.is_empty() {
        return selected;
    }

    let mut columns = LIST_COLUMNS.to_vec();
    if scope.is_network() {
        columns.extend(NETWORK_COLUMNS);
    }
    columns
}

pub fn export_columns(scope: ListScope) -> Vec<Column> {
    let mut columns = EXPORT_COLUMNS.to_vec();
    if scope.is_network() {
        columns.extend(NETWORK_COLUMNS);
    }
    columns
}

pub fn column_dtos(columns: &[Column], scope: ListScope) -> Vec<ColumnDto> {
    columns.iter().map(|c| c.to_dto(scope)).collect()
}

pub fn sortable_columns(scope: ListScope) -> Vec<SortColumn> {
    let mut columns = SortColumn::ALWAYS.to_vec();
    if scope.is_network() {
        columns.push(SortColumn::BlogId);
    }
    columns
}

pub const BULK_DELETE: &str = "bulk-delete";
pub const BULK_DELETE_ALL: &str = "bulk-delete-all";
/// Older admin forms post this key for "delete all".
pub const BULK_DELETE_ALL_LEGACY: &str = "bulk-delete-all-admin";

pub fn bulk_actions() -> Vec<BulkActionDto> {
    vec![
        BulkActionDto {
            key: BULK_DELETE.into(),
            label: "Delete Selected Records".into(),
        },
        BulkActionDto {
            key: BULK_DELETE_ALL.into(),
            label: "Delete All Records".into(),
        },
    ]
}
