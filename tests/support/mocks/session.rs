// tests/support/mocks/session.rs
use async_trait::async_trait;
use login_history::application::ApplicationResult;
use login_history::application::error::ApplicationError;
use login_history::application::ports::session::{SessionPointer, SessionPointerStore};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pointer store whose backend is down: every call fails.
#[derive(Default)]
pub struct UnavailablePointerStore {
    calls: AtomicUsize,
}

impl UnavailablePointerStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> ApplicationResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApplicationError::infrastructure("pointer store unavailable"))
    }
}

#[async_trait]
impl SessionPointerStore for UnavailablePointerStore {
    async fn set(&self, _session_token: &str, _pointer: SessionPointer) -> ApplicationResult<()> {
        self.fail()
    }

    async fn get(&self, _session_token: &str) -> ApplicationResult<Option<SessionPointer>> {
        self.fail()
    }

    async fn remove(&self, _session_token: &str) -> ApplicationResult<()> {
        self.fail()
    }
}
