// src/infrastructure/geo/http.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::geo::{GeoLocation, GeoLocator};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEO_API_URL: &str = "https://tools.keycdn.com/geo.json";
const HOST_PARAM: &str = "host";
pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("keycdn-tools:", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GeoEnvelope {
    #[serde(default)]
    data: Option<GeoData>,
}

#[derive(Debug, Deserialize)]
struct GeoData {
    #[serde(default)]
    geo: Option<GeoLocation>,
}

/// Looks addresses up with a GET to `<base_url>?host=<ip>`; the answer's
/// `data.geo` object carries the fields we keep.
#[derive(Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGeoLocator {
    /// Any `host` parameter already in `base_url` is dropped; the looked-up
    /// address is always sent encoded as the only `host` value.
    pub fn new(base_url: &str, timeout: Duration) -> ApplicationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let mut base_url = Url::parse(base_url)
            .map_err(|err| ApplicationError::infrastructure(format!("invalid geo api url: {err}")))?;
        let kept: Vec<(String, String)> = base_url
            .query_pairs()
            .filter(|(key, _)| key != HOST_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        base_url.set_query(None);
        if !kept.is_empty() {
            base_url.query_pairs_mut().extend_pairs(kept);
        }

        Ok(Self { client, base_url })
    }

    fn lookup_url(&self, ip: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair(HOST_PARAM, ip);
        url
    }

    async fn fetch(&self, ip: &str) -> Result<Option<GeoLocation>, reqwest::Error> {
        let envelope: GeoEnvelope = self
            .client
            .get(self.lookup_url(ip))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.data.and_then(|data| data.geo).map(clean))
    }
}

/// Empty strings in the answer mean "not known".
fn clean(location: GeoLocation) -> GeoLocation {
    let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    GeoLocation {
        country_name: keep(location.country_name),
        country_code: keep(location.country_code),
        timezone: keep(location.timezone),
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: &str) -> Option<GeoLocation> {
        match self.fetch(ip).await {
            Ok(location) => location,
            Err(err) => {
                tracing::error!(%ip, error = %err, "geo lookup failed");
                None
            }
        }
    }
}

/// Used when geo lookup is switched off.
#[derive(Debug, Default, Clone)]
pub struct NoopGeoLocator;

#[async_trait]
impl GeoLocator for NoopGeoLocator {
    async fn locate(&self, _ip: &str) -> Option<GeoLocation> {
        None
    }
}
