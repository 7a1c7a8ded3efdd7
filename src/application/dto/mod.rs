pub mod auth;
pub mod login_history;
pub mod pagination;
pub mod serde_time;

pub use auth::{AuthTokenDto, AuthenticatedUser, ListScope, TokenSubject};
pub use login_history::{
    BulkActionDto, CellDto, ColumnDto, ColumnsDto, LoginHistoryListDto, LoginHistoryRowDto,
};
pub use pagination::Page;
