mod delete;
mod service;

pub use delete::{BulkAction, BulkDeleteCommand};
pub use service::LoginHistoryCommandService;
