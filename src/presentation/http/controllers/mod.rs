// src/presentation/http/controllers/mod.rs
pub mod login_history;
pub mod tracker;
