use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    commands::capability::ensure_capability,
    dto::AuthenticatedUser,
    ports::{
        directory::UserDirectory, geo::GeoLocator, session::SessionPointerStore,
        settings::SettingsReader, time::Clock,
    },
};
use crate::domain::login::LoginRecordRepository;

/// Records the login lifecycle of users: login, failed login, heartbeat and logout.
pub struct LoginTracker {
    pub(super) repo: Arc<dyn LoginRecordRepository>,
    pub(super) directory: Arc<dyn UserDirectory>,
    pub(super) geo: Arc<dyn GeoLocator>,
    pub(super) pointers: Arc<dyn SessionPointerStore>,
    pub(super) settings: SettingsReader,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) multisite: bool,
}

impl LoginTracker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: Arc<dyn LoginRecordRepository>,
        directory: Arc<dyn UserDirectory>,
        geo: Arc<dyn GeoLocator>,
        pointers: Arc<dyn SessionPointerStore>,
        settings: SettingsReader,
        clock: Arc<dyn Clock>,
        multisite: bool,
    ) -> Self {
        Self {
            repo,
            directory,
            geo,
            pointers,
            settings,
            clock,
            multisite,
        }
    }

    pub(super) fn ensure_writer(&self, actor: &AuthenticatedUser) -> ApplicationResult<()> {
        ensure_capability(actor, "tracker", "write")
    }
}
