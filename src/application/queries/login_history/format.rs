// src/application/queries/login_history/format.rs
use super::columns::Column;
use crate::domain::login::{LoginRecord, PresenceStatus, PresenceThresholds};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

pub const UNKNOWN: &str = "unknown";
pub const UNKNOWN_SYMBOL: &str = "—";
pub const DEFAULT_TABLE_TIMEZONE: &str = "UTC";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timezone the table renders times in: an IANA name or a manual `UTC±h[.h]` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTimezone {
    Named(Tz),
    Offset(FixedOffset),
}

impl Default for TableTimezone {
    fn default() -> Self {
        Self::Named(Tz::UTC)
    }
}

impl TableTimezone {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Ok(tz) = value.parse::<Tz>() {
            return Some(Self::Named(tz));
        }
        let rest = value.strip_prefix("UTC")?;
        let (sign, hours) = match rest.chars().next()? {
            '+' => (1.0, &rest[1..]),
            '-' => (-1.0, &rest[1..]),
            _ => return None,
        };
        let hours: f64 = hours.parse().ok()?;
        #[allow(clippy::cast_possible_truncation)]
        let seconds = (sign * hours * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).map(Self::Offset)
    }

    /// Falls back to UTC when the value is missing or not a timezone.
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn format(&self, at: DateTime<Utc>, pattern: &str) -> String {
        match self {
            Self::Named(tz) => at.with_timezone(tz).format(pattern).to_string(),
            Self::Offset(offset) => at.with_timezone(offset).format(pattern).to_string(),
        }
    }

    pub fn display(&self, at: DateTime<Utc>) -> String {
        self.format(at, DATE_TIME_FORMAT)
    }

    /// Interprets a wall-clock time in this zone. Ambiguous times take the
    /// earlier instant; times skipped by a DST jump yield `None`.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Offset(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for TableTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Offset(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let abs = secs.abs();
                if abs % 3600 == 0 {
                    write!(f, "UTC{sign}{}", abs / 3600)
                } else {
                    write!(f, "UTC{sign}{}", f64::from(abs) / 3600.0)
                }
            }
        }
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Human readable distance between two instants, e.g. "5 mins" or "1 day".
pub fn human_time_diff(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let diff = (to - from).num_seconds().abs();

    let (amount, singular, plural) = if diff < MINUTE {
        (diff, "second", "seconds")
    } else if diff < HOUR {
        (rounded(diff, MINUTE), "min", "mins")
    } else if diff < DAY {
        (rounded(diff, HOUR), "hour", "hours")
    } else if diff < WEEK {
        (rounded(diff, DAY), "day", "days")
    } else if diff < MONTH {
        (rounded(diff, WEEK), "week", "weeks")
    } else if diff < YEAR {
        (rounded(diff, MONTH), "month", "months")
    } else {
        (rounded(diff, YEAR), "year", "years")
    };

    let amount = amount.max(1);
    let unit = if amount == 1 { singular } else { plural };
    format!("{amount} {unit}")
}

fn rounded(diff: i64, unit: i64) -> i64 {
    (diff + unit / 2) / unit
}

fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn is_unknown(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty() || v.trim().eq_ignore_ascii_case(UNKNOWN))
}

/// Renders record fields as table cells in the table timezone.
pub struct CellFormatter<'a> {
    timezone: &'a TableTimezone,
    now: DateTime<Utc>,
    thresholds: PresenceThresholds,
}

impl<'a> CellFormatter<'a> {
    pub fn new(timezone: &'a TableTimezone, now: DateTime<Utc>, thresholds: PresenceThresholds) -> Self {
        Self {
            timezone,
            now,
            thresholds,
        }
    }

    pub fn presence(&self, record: &LoginRecord) -> PresenceStatus {
        self.thresholds
            .classify(record.login_status, record.time_last_seen, self.now)
    }

    pub fn last_seen_title(&self, record: &LoginRecord) -> Option<String> {
        record
            .user_id
            .map(|_| self.timezone.display(record.time_last_seen))
    }

    /// `current_roles` are the roles the directory reports for the record's user.
    pub fn cell(&self, record: &LoginRecord, column: Column, current_roles: Option<&[String]>) -> String {
        match column {
            Column::UserId => record
                .user_id
                .map_or_else(|| UNKNOWN.to_string(), |id| id.to_string()),
            Column::Username => record.username.clone(),
            Column::Role => match (record.user_id, current_roles) {
                (Some(_), Some(roles)) if !roles.is_empty() => roles.join(","),
                _ => UNKNOWN.to_string(),
            },
            Column::OldRole => or_unknown(record.old_role.as_deref()),
            Column::IpAddress => or_unknown(record.ip_address.as_deref()),
            Column::Timezone => or_unknown(record.geo.timezone.as_deref()),
            Column::OperatingSystem => or_unknown(record.operating_system.as_deref()),
            Column::UserAgent => or_unknown(record.user_agent.as_deref()),
            Column::Browser => self.browser(record),
            Column::CountryName => self.country_name(record),
            Column::CountryCode => self.country_code(record),
            Column::TimeLogin => self.timezone.display(record.time_login),
            Column::TimeLogout => match (record.user_id, record.time_logout) {
                (Some(_), Some(logout)) => self.timezone.display(logout),
                _ => UNKNOWN_SYMBOL.to_string(),
            },
            Column::TimeLastSeen => {
                if record.user_id.is_none() {
                    UNKNOWN_SYMBOL.to_string()
                } else {
                    format!("{} ago", human_time_diff(record.time_last_seen, self.now))
                }
            }
            Column::Duration => human_time_diff(record.time_login, record.last_activity()),
            Column::LoginStatus => record.login_status.label().to_string(),
            Column::IsSuperAdmin => (if record.is_super_admin { "Yes" } else { "No" }).to_string(),
            Column::BlogId => i64::from(record.blog_id).to_string(),
        }
    }

    /// Last-seen as exported: relative time followed by the absolute time.
    pub fn export_last_seen(&self, record: &LoginRecord) -> String {
        if record.user_id.is_none() {
            return UNKNOWN_SYMBOL.to_string();
        }
        format!(
            "{} ago ({})",
            human_time_diff(record.time_last_seen, self.now),
            self.timezone.display(record.time_last_seen)
        )
    }

    fn browser(&self, record: &LoginRecord) -> String {
        match (record.browser.as_deref(), record.browser_version.as_deref()) {
            (Some(name), _) if name.trim().is_empty() => UNKNOWN.to_string(),
            (None, _) => UNKNOWN.to_string(),
            (Some(name), Some(version)) if !version.trim().is_empty() => format!("{name} ({version})"),
            (Some(name), _) => name.to_string(),
        }
    }

    fn country_code(&self, record: &LoginRecord) -> String {
        let code = record.geo.country_code.as_deref();
        if is_unknown(code) {
            UNKNOWN.to_string()
        } else {
            code.unwrap_or(UNKNOWN).to_string()
        }
    }

    fn country_name(&self, record: &LoginRecord) -> String {
        let name = record.geo.country_name.as_deref();
        match name {
            Some(name) if !is_unknown(Some(name)) => {
                format!("{name}({})", self.country_code(record))
            }
            _ => UNKNOWN.to_string(),
        }
    }
}
