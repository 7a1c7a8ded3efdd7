// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{login_history::LoginHistoryCommandService, tracker::LoginTracker},
        dto::AuthenticatedUser,
        error::ApplicationError,
        ports::{
            directory::UserDirectory,
            geo::GeoLocator,
            security::TokenManager,
            session::SessionPointerStore,
            settings::{SettingsReader, SettingsStore},
            time::Clock,
        },
        queries::login_history::LoginHistoryQueryService,
    },
    domain::login::LoginRecordRepository,
};

/// Deployment switches that shape the services.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub multisite: bool,
    pub settings_prefix: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            multisite: false,
            settings_prefix: "login_history".into(),
        }
    }
}

pub struct ApplicationServices {
    pub tracker: Arc<LoginTracker>,
    pub login_history_queries: Arc<LoginHistoryQueryService>,
    pub login_history_commands: Arc<LoginHistoryCommandService>,
    token_manager: Arc<dyn TokenManager>,
    settings: SettingsReader,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        login_repo: Arc<dyn LoginRecordRepository>,
        directory: Arc<dyn UserDirectory>,
        geo: Arc<dyn GeoLocator>,
        pointers: Arc<dyn SessionPointerStore>,
        settings_store: Arc<dyn SettingsStore>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
        options: ServiceOptions,
    ) -> Self {
        let settings = SettingsReader::new(settings_store, options.settings_prefix);

        let tracker = Arc::new(LoginTracker::new(
            Arc::clone(&login_repo),
            Arc::clone(&directory),
            geo,
            pointers,
            settings.clone(),
            Arc::clone(&clock),
            options.multisite,
        ));

        let login_history_queries = Arc::new(LoginHistoryQueryService::new(
            Arc::clone(&login_repo),
            directory,
            settings.clone(),
            clock,
        ));

        let login_history_commands = Arc::new(LoginHistoryCommandService::new(login_repo));

        Self {
            tracker,
            login_history_queries,
            login_history_commands,
            token_manager,
            settings,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }

    pub fn settings(&self) -> &SettingsReader {
        &self.settings
    }

    /// Authenticate a raw bearer token and ensure the subject holds the capability.
    pub async fn authenticate_and_authorize(
        &self,
        token: &str,
        resource: &str,
        action: &str,
    ) -> ApplicationResult<AuthenticatedUser> {
        let user = self.token_manager.authenticate(token).await?;
        if user.has_capability(resource, action) {
            Ok(user)
        } else {
            Err(ApplicationError::forbidden(format!(
                "missing capability {resource}:{action}"
            )))
        }
    }
}
