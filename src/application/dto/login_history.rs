use super::pagination::Page;
use crate::domain::login::{LoginStatus, PresenceStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CellDto {
    pub column: String,
    pub value: String,
}

/// A formatted list-table row. `cells` follows the order of the printable columns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginHistoryRowDto {
    pub id: i64,
    pub user_id: Option<i64>,
    pub login_status: LoginStatus,
    /// CSS-style class for the row, e.g. `login_status_fail`.
    pub row_class: String,
    pub presence: PresenceStatus,
    /// Full last-seen timestamp in the table timezone, shown as a tooltip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_title: Option<String>,
    pub cells: Vec<CellDto>,
}

impl LoginHistoryRowDto {
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColumnDto {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Whether the first click on the header sorts descending.
    pub initially_desc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkActionDto {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnsDto {
    pub columns: Vec<ColumnDto>,
    /// Every column key the table can be ordered by in this scope.
    pub sortable_columns: Vec<String>,
    pub bulk_actions: Vec<BulkActionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginHistoryListDto {
    pub page: Page<LoginHistoryRowDto>,
    pub columns: Vec<ColumnDto>,
    pub sortable_columns: Vec<String>,
    /// Timezone every time column of this page is shown in.
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
