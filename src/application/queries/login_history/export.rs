use super::columns::{Column, export_columns};
use super::common::{NO_ITEMS_MESSAGE, ensure_read_capability, resolve_scope};
use super::format::{CellFormatter, TableTimezone};
use super::params::LoginHistoryParams;
use super::service::LoginHistoryQueryService;
use crate::application::{ApplicationResult, dto::AuthenticatedUser, error::ApplicationError};
use crate::domain::login::{LoginRecord, PageRequest};
use crate::domain::user::UserId;
use std::collections::HashMap;

const CSV_DELIMITER: u8 = b';';
const FILENAME_TIME_FORMAT: &str = "%-m-%-d-%y_%H-%M";

/// A finished CSV download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
}

impl CsvExport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

impl LoginHistoryQueryService {
    /// Every row matching the filters, unpaged, as semicolon-separated CSV.
    /// An empty result yields the no-records message instead of a header.
    pub async fn export_csv(
        &self,
        actor: &AuthenticatedUser,
        params: LoginHistoryParams,
    ) -> ApplicationResult<CsvExport> {
        ensure_read_capability(actor)?;
        let scope = resolve_scope(actor, params.wants_network())?;
        let timezone = TableTimezone::resolve(actor.timezone.as_deref());

        let filter = params
            .to_filter(scope, &timezone, self.directory.as_ref())
            .await?;
        let records = self
            .repo
            .list(&filter, params.sort(scope), PageRequest::all())
            .await?;

        let now = self.clock.now();
        let filename = format!(
            "{}_{}.csv",
            self.settings.prefix(),
            timezone.format(now, FILENAME_TIME_FORMAT)
        );

        if records.is_empty() {
            return Ok(CsvExport {
                filename,
                body: NO_ITEMS_MESSAGE.as_bytes().to_vec(),
            });
        }

        let columns = export_columns(scope);
        let roles = self.roles_for(&records, &columns).await?;
        let thresholds = self.settings.basics().await.thresholds();
        let formatter = CellFormatter::new(&timezone, now, thresholds);
        let body = write_csv(&records, &columns, &formatter, &roles)?;

        tracing::info!(
            user_id = %actor.id,
            network = scope.is_network(),
            rows = records.len(),
            %filename,
            "exported login history"
        );

        Ok(CsvExport { filename, body })
    }
}

fn write_csv(
    records: &[LoginRecord],
    columns: &[Column],
    formatter: &CellFormatter<'_>,
    roles: &HashMap<UserId, Vec<String>>,
) -> ApplicationResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(Column::label))
        .map_err(csv_error)?;

    for record in records {
        let current_roles = record
            .user_id
            .and_then(|id| roles.get(&id))
            .map(Vec::as_slice);
        let row = columns.iter().map(|column| match column {
            Column::TimeLastSeen => formatter.export_last_seen(record),
            other => formatter.cell(record, *other, current_roles),
        });
        writer.write_record(row).map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|err| ApplicationError::infrastructure(format!("csv flush failed: {err}")))
}

fn csv_error(err: csv::Error) -> ApplicationError {
    ApplicationError::infrastructure(format!("csv write failed: {err}"))
}
