mod columns;
mod common;
mod export;
mod format;
mod list;
mod params;
mod service;

pub use columns::{
    BULK_DELETE, BULK_DELETE_ALL, BULK_DELETE_ALL_LEGACY, Column, bulk_actions, export_columns,
    printable_columns, sortable_columns,
};
pub use common::{NO_ITEMS_MESSAGE, PER_PAGE, resolve_scope};
pub use export::CsvExport;
pub use format::{CellFormatter, TableTimezone, UNKNOWN, UNKNOWN_SYMBOL, human_time_diff};
pub use params::{LoginHistoryParams, SUPER_ADMIN_ROLE};
pub use service::LoginHistoryQueryService;
