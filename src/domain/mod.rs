// src/domain/mod.rs
pub mod errors;
pub mod login;
pub mod user;
