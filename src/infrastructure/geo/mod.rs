mod http;

pub use http::{DEFAULT_GEO_API_URL, DEFAULT_GEO_TIMEOUT, HttpGeoLocator, NoopGeoLocator};
