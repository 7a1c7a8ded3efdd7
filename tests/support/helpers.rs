// tests/support/helpers.rs
use std::sync::Arc;

use super::mocks::{
    FixedGeoLocator, InMemoryDirectory, InMemoryLoginRepo, InMemorySettings, StaticTokenManager,
    TestClock,
};
use axum::body;
use axum::http::StatusCode;
use login_history::application::ports::session::SessionPointerStore;
use login_history::application::services::{ApplicationServices, ServiceOptions};
use login_history::infrastructure::security::session_store::InMemorySessionPointerStore;
use login_history::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use serde_json::Value;

/// Services wired to in-memory ports, with handles on every port for assertions.
pub struct TestContext {
    pub repo: Arc<InMemoryLoginRepo>,
    pub pointers: Arc<InMemorySessionPointerStore>,
    pub geo: Arc<FixedGeoLocator>,
    pub clock: Arc<TestClock>,
    pub services: Arc<ApplicationServices>,
}

pub struct TestContextBuilder {
    directory: InMemoryDirectory,
    settings: InMemorySettings,
    geo: FixedGeoLocator,
    pointer_store: Option<Arc<dyn SessionPointerStore>>,
    multisite: bool,
}

/// Matches the default `SESSION_POINTER_TTL_SECS`.
pub const POINTER_TTL_SECS: u64 = 60 * 60 * 24 * 14;

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            directory: InMemoryDirectory::sample(),
            settings: InMemorySettings::default(),
            geo: FixedGeoLocator::germany(),
            pointer_store: None,
            multisite: false,
        }
    }
}

impl TestContextBuilder {
    pub fn multisite(mut self) -> Self {
        self.multisite = true;
        self
    }

    pub fn directory(mut self, directory: InMemoryDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn settings(mut self, settings: InMemorySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn geo(mut self, geo: FixedGeoLocator) -> Self {
        self.geo = geo;
        self
    }

    /// Replaces the in-memory pointer store the services write to.
    pub fn pointer_store(mut self, store: Arc<dyn SessionPointerStore>) -> Self {
        self.pointer_store = Some(store);
        self
    }

    pub fn build(self) -> TestContext {
        let repo = Arc::new(InMemoryLoginRepo::default());
        let geo = Arc::new(self.geo);
        let clock = Arc::new(TestClock::default());
        let pointers = Arc::new(InMemorySessionPointerStore::new(
            POINTER_TTL_SECS,
            clock.clone(),
        ));
        let service_pointers: Arc<dyn SessionPointerStore> = match self.pointer_store {
            Some(store) => store,
            None => pointers.clone(),
        };

        let services = Arc::new(ApplicationServices::new(
            repo.clone(),
            Arc::new(self.directory),
            geo.clone(),
            service_pointers,
            Arc::new(self.settings),
            Arc::new(StaticTokenManager),
            clock.clone(),
            ServiceOptions {
                multisite: self.multisite,
                ..ServiceOptions::default()
            },
        ));

        TestContext {
            repo,
            pointers,
            geo,
            clock,
            services,
        }
    }
}

impl TestContext {
    pub fn builder() -> TestContextBuilder {
        TestContextBuilder::default()
    }

    /// Router without the rate limiter; in-process requests carry no peer address.
    pub fn router(&self) -> axum::Router {
        let state = HttpState {
            services: Arc::clone(&self.services),
        };
        build_router_with_rate_limiter(state, &[], false)
    }
}

pub fn make_context() -> TestContext {
    TestContext::builder().build()
}

pub fn make_test_router() -> axum::Router {
    make_context().router()
}

pub async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("expected valid json body")
}

/// Assert that a response is an ErrorResponse JSON with the expected status and error string.
pub async fn assert_error_response(resp: axum::response::Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024).await.expect("read body");
    let ct = parts.headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {}", ct);
    let json: Value = serde_json::from_slice(&body_bytes).expect("expected valid json body for error");
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json.get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {}", err_field);
    assert!(!msg_field.is_empty(), "expected non-empty message field in ErrorResponse");
}
