// src/domain/login/mod.rs
pub mod entity;
pub mod filter;
pub mod presence;
pub mod repository;
pub mod user_agent;

pub use entity::{BlogId, GeoFields, LoginRecord, LoginRecordId, LoginStatus, NewLoginRecord};
pub use filter::{
    DateField, DateRange, LoginRecordFilter, OldRoleFilter, PageRequest, Sort, SortColumn,
    SortOrder,
};
pub use presence::{PresenceStatus, PresenceThresholds};
pub use repository::LoginRecordRepository;
pub use user_agent::ClientSoftware;
