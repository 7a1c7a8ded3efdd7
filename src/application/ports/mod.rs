// src/application/ports/mod.rs
pub mod directory;
pub mod geo;
pub mod security;
pub mod session;
pub mod settings;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type ClockPort = dyn time::Clock;
pub type GeoLocatorPort = dyn geo::GeoLocator;
pub type SessionPointerStorePort = dyn session::SessionPointerStore;
pub type SettingsStorePort = dyn settings::SettingsStore;
pub type TokenManagerPort = dyn security::TokenManager;
pub type UserDirectoryPort = dyn directory::UserDirectory;
