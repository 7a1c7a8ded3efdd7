// tests/support/mocks/geo.rs
use async_trait::async_trait;
use login_history::application::ports::geo::{GeoLocation, GeoLocator};
use std::sync::Mutex;

/// Answers every lookup with the same location and remembers the addresses asked for.
#[derive(Debug, Default)]
pub struct FixedGeoLocator {
    location: Option<GeoLocation>,
    lookups: Mutex<Vec<String>>,
}

impl FixedGeoLocator {
    pub fn germany() -> Self {
        Self {
            location: Some(GeoLocation {
                country_name: Some("Germany".into()),
                country_code: Some("DE".into()),
                timezone: Some("Europe/Berlin".into()),
            }),
            lookups: Mutex::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoLocator for FixedGeoLocator {
    async fn locate(&self, ip: &str) -> Option<GeoLocation> {
        self.lookups.lock().unwrap().push(ip.to_string());
        self.location.clone()
    }
}
