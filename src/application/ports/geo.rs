// src/application/ports/geo.rs
use async_trait::async_trait;
use serde::Deserialize;

/// Subset of a geo-IP answer that ends up on a login record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Looks up `ip`. Implementations log their own failures and return `None`.
    async fn locate(&self, ip: &str) -> Option<GeoLocation>;
}
