// src/application/queries/login_history/params.rs
use super::format::TableTimezone;
use crate::application::dto::ListScope;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::directory::UserDirectory;
use crate::domain::login::{
    DateField, DateRange, LoginRecordFilter, LoginStatus, OldRoleFilter, Sort, SortColumn,
    SortOrder,
};
use crate::domain::user::UserId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

pub const SUPER_ADMIN_ROLE: &str = "superadmin";

/// Raw list-table query string. Every value arrives as text; empty means unset.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginHistoryParams {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub browser: Option<String>,
    pub operating_system: Option<String>,
    pub ip_address: Option<String>,
    pub timezone: Option<String>,
    pub country_name: Option<String>,
    pub login_status: Option<String>,
    /// Current role, or `superadmin`.
    pub role: Option<String>,
    /// Role at login time, or `superadmin`.
    pub old_role: Option<String>,
    /// One of `login`, `logout`, `last_seen`.
    pub date_type: Option<String>,
    /// `YYYY-MM-DD` in the viewer's timezone.
    pub date_from: Option<String>,
    /// `YYYY-MM-DD` in the viewer's timezone.
    pub date_to: Option<String>,
    /// `yes` or `no`.
    pub is_super_admin: Option<String>,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub paged: Option<String>,
    /// `network` for the network-wide table.
    pub scope: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn owned(value: Option<&String>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

impl LoginHistoryParams {
    pub fn wants_network(&self) -> bool {
        non_empty(self.scope.as_ref()) == Some("network")
    }

    pub fn page_number(&self) -> u32 {
        non_empty(self.paged.as_ref())
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Unknown `orderby` values fall back to the default ordering.
    pub fn sort(&self, scope: ListScope) -> Sort {
        let Some(column) =
            non_empty(self.orderby.as_ref()).and_then(|c| SortColumn::parse(c, scope.is_network()))
        else {
            return Sort::default();
        };
        let order = non_empty(self.order.as_ref())
            .and_then(SortOrder::parse)
            .unwrap_or(SortOrder::Asc);
        Sort { column, order }
    }

    /// Builds the record filter. Current-role filters are resolved through the
    /// directory; dates are read in `input_timezone` and converted to UTC.
    pub async fn to_filter(
        &self,
        scope: ListScope,
        input_timezone: &TableTimezone,
        directory: &dyn UserDirectory,
    ) -> ApplicationResult<LoginRecordFilter> {
        let mut filter = LoginRecordFilter::for_blog(scope.blog_id());

        if let Some(raw) = non_empty(self.user_id.as_ref()) {
            let id = raw
                .parse::<i64>()
                .map_err(|_| ApplicationError::validation("user_id must be an integer"))?;
            filter.user_id = Some(UserId::new(id)?);
        }

        filter.username = owned(self.username.as_ref());
        filter.browser = owned(self.browser.as_ref());
        filter.operating_system = owned(self.operating_system.as_ref());
        filter.ip_address = owned(self.ip_address.as_ref());
        filter.timezone = owned(self.timezone.as_ref());
        filter.country_name = owned(self.country_name.as_ref());

        if let Some(raw) = non_empty(self.login_status.as_ref()) {
            filter.login_status = Some(raw.parse::<LoginStatus>()?);
        }

        if let Some(role) = non_empty(self.role.as_ref()) {
            if role == SUPER_ADMIN_ROLE {
                filter.usernames_in = Some(directory.super_admin_usernames().await?);
            } else {
                filter.user_ids_in = Some(directory.user_ids_with_role(role).await?);
            }
        }

        filter.old_role = non_empty(self.old_role.as_ref()).map(|role| {
            if role == SUPER_ADMIN_ROLE {
                OldRoleFilter::SuperAdmin
            } else {
                OldRoleFilter::Contains(role.to_string())
            }
        });

        filter.date_range = self.date_range(input_timezone)?;

        filter.is_super_admin = match non_empty(self.is_super_admin.as_ref()) {
            Some("yes") => Some(true),
            Some("no") => Some(false),
            _ => None,
        };

        Ok(filter)
    }

    fn date_range(&self, timezone: &TableTimezone) -> ApplicationResult<Option<DateRange>> {
        let Some(field) = non_empty(self.date_type.as_ref()).and_then(DateField::parse) else {
            return Ok(None);
        };

        let from = non_empty(self.date_from.as_ref())
            .map(|d| day_bound(d, NaiveTime::MIN, timezone))
            .transpose()?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let to = non_empty(self.date_to.as_ref())
            .map(|d| day_bound(d, end_of_day, timezone))
            .transpose()?;

        if from.is_none() && to.is_none() {
            return Ok(None);
        }
        Ok(Some(DateRange { field, from, to }))
    }
}

fn day_bound(
    date: &str,
    time: NaiveTime,
    timezone: &TableTimezone,
) -> ApplicationResult<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApplicationError::validation(format!("invalid date: {date}")))?;
    let local = day.and_time(time);
    timezone
        .to_utc(local)
        .or_else(|| TableTimezone::default().to_utc(local))
        .ok_or_else(|| ApplicationError::validation(format!("invalid local time: {local}")))
}
