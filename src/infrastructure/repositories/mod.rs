// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_login_record;
mod postgres_settings;
mod postgres_user_directory;

pub use error::map_sqlx;
pub use postgres_login_record::PostgresLoginRecordRepository;
pub use postgres_settings::PostgresSettingsStore;
pub use postgres_user_directory::PostgresUserDirectory;
