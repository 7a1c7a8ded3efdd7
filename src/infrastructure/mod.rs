pub mod database;
pub mod geo;
pub mod repositories;
pub mod security;
pub mod time;
