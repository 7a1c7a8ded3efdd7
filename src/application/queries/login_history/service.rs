use std::collections::HashMap;
use std::sync::Arc;

use super::columns::{self, Column};
use super::format::{CellFormatter, TableTimezone};
use crate::application::{
    ApplicationResult,
    dto::{CellDto, ListScope, LoginHistoryRowDto},
    ports::{directory::UserDirectory, settings::SettingsReader, time::Clock},
};
use crate::domain::login::{LoginRecord, LoginRecordRepository};
use crate::domain::user::UserId;

pub struct LoginHistoryQueryService {
    pub(super) repo: Arc<dyn LoginRecordRepository>,
    pub(super) directory: Arc<dyn UserDirectory>,
    pub(super) settings: SettingsReader,
    pub(super) clock: Arc<dyn Clock>,
}

impl LoginHistoryQueryService {
    pub fn new(
        repo: Arc<dyn LoginRecordRepository>,
        directory: Arc<dyn UserDirectory>,
        settings: SettingsReader,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            directory,
            settings,
            clock,
        }
    }

    /// Network scope reads its selection from the network settings, a site from its own.
    pub(super) async fn printable_columns(&self, scope: ListScope) -> Vec<Column> {
        let selection = if scope.is_network() {
            self.settings.network().await.columns
        } else {
            self.settings.advanced().await.columns
        };
        columns::printable_columns(selection.as_deref(), scope)
    }

    pub(super) async fn roles_for(
        &self,
        records: &[LoginRecord],
        columns: &[Column],
    ) -> ApplicationResult<HashMap<UserId, Vec<String>>> {
        if !columns.contains(&Column::Role) {
            return Ok(HashMap::new());
        }
        let mut ids: Vec<UserId> = records.iter().filter_map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.directory.current_roles(&ids).await
    }

    pub(super) async fn format_rows(
        &self,
        records: &[LoginRecord],
        columns: &[Column],
        timezone: &TableTimezone,
    ) -> ApplicationResult<Vec<LoginHistoryRowDto>> {
        let roles = self.roles_for(records, columns).await?;
        let thresholds = self.settings.basics().await.thresholds();
        let formatter = CellFormatter::new(timezone, self.clock.now(), thresholds);

        let rows = records
            .iter()
            .map(|record| {
                let current_roles = record
                    .user_id
                    .and_then(|id| roles.get(&id))
                    .map(Vec::as_slice);
                let cells = columns
                    .iter()
                    .map(|column| CellDto {
                        column: column.key().to_string(),
                        value: formatter.cell(record, *column, current_roles),
                    })
                    .collect();
                LoginHistoryRowDto {
                    id: record.id.into(),
                    user_id: record.user_id.map(Into::into),
                    login_status: record.login_status,
                    row_class: format!("login_status_{}", record.login_status),
                    presence: formatter.presence(record),
                    last_seen_title: formatter.last_seen_title(record),
                    cells,
                }
            })
            .collect();

        Ok(rows)
    }
}
