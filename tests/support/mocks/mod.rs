// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod directory;
pub mod geo;
pub mod repos;
pub mod security;
pub mod session;
pub mod settings;
pub mod time;

pub use directory::InMemoryDirectory;
pub use geo::FixedGeoLocator;
pub use repos::InMemoryLoginRepo;
pub use security::{
    ADMIN_TOKEN, EXPIRED_TOKEN, READER_TOKEN, SITE_TOKEN, StaticTokenManager, TRACKER_TOKEN,
    actor_for,
};
pub use session::UnavailablePointerStore;
pub use settings::InMemorySettings;
pub use time::{TestClock, fixed_now};
