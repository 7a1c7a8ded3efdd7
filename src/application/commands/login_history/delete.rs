use super::LoginHistoryCommandService;
use crate::application::{
    commands::capability::ensure_capability,
    dto::{AuthenticatedUser, ListScope},
    error::{ApplicationError, ApplicationResult},
    queries::login_history::{BULK_DELETE, BULK_DELETE_ALL, BULK_DELETE_ALL_LEGACY, resolve_scope},
};
use crate::domain::login::LoginRecordId;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    DeleteSelected,
    DeleteAll,
}

impl FromStr for BulkAction {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            BULK_DELETE => Ok(Self::DeleteSelected),
            BULK_DELETE_ALL | BULK_DELETE_ALL_LEGACY => Ok(Self::DeleteAll),
            other => Err(ApplicationError::validation(format!(
                "unknown bulk action: {other}"
            ))),
        }
    }
}

pub struct BulkDeleteCommand {
    pub action: BulkAction,
    pub ids: Vec<i64>,
    pub network: bool,
}

impl LoginHistoryCommandService {
    /// Deletes the given rows. In site scope only rows of the viewer's site go.
    pub async fn delete_rows(
        &self,
        actor: &AuthenticatedUser,
        ids: &[i64],
        network: bool,
    ) -> ApplicationResult<u64> {
        let scope = self.delete_scope(actor, network)?;
        if ids.is_empty() {
            return Ok(0);
        }
        let ids = ids
            .iter()
            .map(|id| LoginRecordId::new(*id))
            .collect::<Result<Vec<_>, _>>()?;

        let deleted = self.repo.delete_by_ids(&ids, scope.blog_id()).await?;
        tracing::info!(
            user_id = %actor.id,
            requested = ids.len(),
            deleted,
            "deleted login history rows"
        );
        Ok(deleted)
    }

    /// Empties the site's history, or the whole table in network scope.
    pub async fn delete_all(&self, actor: &AuthenticatedUser, network: bool) -> ApplicationResult<u64> {
        let scope = self.delete_scope(actor, network)?;
        let deleted = self.repo.delete_all(scope.blog_id()).await?;
        tracing::info!(
            user_id = %actor.id,
            network = scope.is_network(),
            deleted,
            "deleted all login history"
        );
        Ok(deleted)
    }

    pub async fn bulk(&self, actor: &AuthenticatedUser, command: BulkDeleteCommand) -> ApplicationResult<u64> {
        match command.action {
            BulkAction::DeleteSelected => self.delete_rows(actor, &command.ids, command.network).await,
            BulkAction::DeleteAll => self.delete_all(actor, command.network).await,
        }
    }

    fn delete_scope(&self, actor: &AuthenticatedUser, network: bool) -> ApplicationResult<ListScope> {
        ensure_capability(actor, "login_history", "delete")?;
        resolve_scope(actor, network)
    }
}
