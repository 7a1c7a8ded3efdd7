use super::columns::{bulk_actions, column_dtos, sortable_columns};
use super::common::{NO_ITEMS_MESSAGE, PER_PAGE, ensure_read_capability, resolve_scope};
use super::format::TableTimezone;
use super::params::LoginHistoryParams;
use super::service::LoginHistoryQueryService;
use crate::application::{
    ApplicationResult,
    dto::{AuthenticatedUser, ColumnsDto, ListScope, LoginHistoryListDto, Page},
};
use crate::domain::login::PageRequest;

impl LoginHistoryQueryService {
    /// One page of the list table, formatted in the viewer's timezone.
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: LoginHistoryParams,
    ) -> ApplicationResult<LoginHistoryListDto> {
        ensure_read_capability(actor)?;
        let scope = resolve_scope(actor, params.wants_network())?;
        let timezone = TableTimezone::resolve(actor.timezone.as_deref());

        let filter = params
            .to_filter(scope, &timezone, self.directory.as_ref())
            .await?;
        let sort = params.sort(scope);
        let current_page = params.page_number();

        let total = self.repo.count(&filter).await?;
        let records = self
            .repo
            .list(&filter, sort, PageRequest::new(current_page, PER_PAGE))
            .await?;

        let columns = self.printable_columns(scope).await;
        let rows = self.format_rows(&records, &columns, &timezone).await?;
        let message = rows.is_empty().then(|| NO_ITEMS_MESSAGE.to_string());

        tracing::debug!(
            user_id = %actor.id,
            network = scope.is_network(),
            total,
            page = current_page,
            "listed login history"
        );

        Ok(LoginHistoryListDto {
            page: Page::new(rows, total, PER_PAGE, current_page),
            columns: column_dtos(&columns, scope),
            sortable_columns: sortable_keys(scope),
            timezone: timezone.to_string(),
            message,
        })
    }

    /// Printable columns with their sort metadata, plus the bulk actions.
    pub async fn columns(
        &self,
        actor: &AuthenticatedUser,
        wants_network: bool,
    ) -> ApplicationResult<ColumnsDto> {
        ensure_read_capability(actor)?;
        let scope = resolve_scope(actor, wants_network)?;
        let columns = self.printable_columns(scope).await;
        Ok(ColumnsDto {
            columns: column_dtos(&columns, scope),
            sortable_columns: sortable_keys(scope),
            bulk_actions: bulk_actions(),
        })
    }
}

fn sortable_keys(scope: ListScope) -> Vec<String> {
    sortable_columns(scope)
        .into_iter()
        .map(|c| c.key().to_string())
        .collect()
}
