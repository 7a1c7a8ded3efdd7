use super::LoginTracker;
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
    ports::session::SessionPointer,
};
use crate::domain::login::{
    BlogId, ClientSoftware, GeoFields, LoginRecordId, LoginStatus, NewLoginRecord,
};
use crate::domain::user::{UserId, UserSnapshot};
use chrono::{DateTime, Utc};

/// What the caller knows about the client that attempted to log in.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub struct LoginEvent {
    pub user_id: UserId,
    /// Login name as typed; falls back to the directory's username when empty.
    pub username: String,
    pub session_token: String,
    pub client: ClientInfo,
}

pub struct FailedLoginEvent {
    pub username: String,
    pub client: ClientInfo,
}

impl LoginTracker {
    /// Saves a successful login and remembers it for the session.
    ///
    /// Returns `Ok(None)` when the row could not be written. Fails with
    /// [`ApplicationError::Blocked`] when the user may not log in on this site.
    pub async fn record_login(
        &self,
        actor: &AuthenticatedUser,
        event: LoginEvent,
    ) -> ApplicationResult<Option<LoginRecordId>> {
        self.ensure_writer(actor)?;
        if event.session_token.trim().is_empty() {
            return Err(ApplicationError::validation("session_token is required"));
        }

        let user = self
            .directory
            .find_user(event.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("user {}", event.user_id)))?;

        let blog_id = actor.blog_id;
        let now = self.clock.now();
        let username = if event.username.trim().is_empty() {
            user.username.clone()
        } else {
            event.username
        };

        let mut record = self
            .new_record(username, event.session_token.clone(), event.client, blog_id, now)
            .await;
        record.user_id = Some(user.id);
        record.login_status = LoginStatus::Login;
        record.old_role = Some(user.joined_roles());
        record.is_super_admin = self.multisite && user.is_super_admin;

        let id = match self.repo.insert(record).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(user_id = %user.id, error = %err, "failed to save login");
                return Ok(None);
            }
        };

        if let Err(err) = self
            .pointers
            .set(&event.session_token, SessionPointer::new(id, blog_id, user.id))
            .await
        {
            tracing::error!(record_id = id.0, error = %err, "failed to store session pointer");
        }

        self.enforce_network_block(&user, blog_id, id, &event.session_token, now)
            .await?;

        tracing::info!(
            record_id = id.0,
            user_id = %user.id,
            blog_id = blog_id.0,
            "after save login"
        );
        Ok(Some(id))
    }

    /// Saves a failed attempt. No session pointer is kept for it.
    pub async fn record_failed_login(
        &self,
        actor: &AuthenticatedUser,
        event: FailedLoginEvent,
    ) -> ApplicationResult<Option<LoginRecordId>> {
        self.ensure_writer(actor)?;
        let now = self.clock.now();
        let mut record = self
            .new_record(event.username, String::new(), event.client, actor.blog_id, now)
            .await;
        record.login_status = LoginStatus::Fail;

        match self.repo.insert(record).await {
            Ok(id) => {
                tracing::debug!(record_id = id.0, "saved failed login");
                Ok(Some(id))
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save failed login");
                Ok(None)
            }
        }
    }

    async fn new_record(
        &self,
        username: String,
        session_token: String,
        client: ClientInfo,
        blog_id: BlogId,
        now: DateTime<Utc>,
    ) -> NewLoginRecord {
        let user_agent = client.user_agent.filter(|ua| !ua.trim().is_empty());
        let software = ClientSoftware::detect(user_agent.as_deref().unwrap_or_default());
        let ip_address = client.ip_address.filter(|ip| !ip.trim().is_empty());
        let geo = match ip_address.as_deref() {
            Some(ip) => self.geo.locate(ip).await.unwrap_or_default(),
            None => Default::default(),
        };

        NewLoginRecord {
            user_id: None,
            session_token,
            username,
            time_login: now,
            ip_address,
            browser: software.browser,
            browser_version: software.version,
            operating_system: software.platform,
            old_role: None,
            user_agent,
            login_status: LoginStatus::Fail,
            is_super_admin: false,
            blog_id,
            geo: GeoFields {
                timezone: geo.timezone,
                country_name: geo.country_name,
                country_code: geo.country_code,
            },
        }
    }

    /// Network sites may refuse users that are not members of them.
    async fn enforce_network_block(
        &self,
        user: &UserSnapshot,
        blog_id: BlogId,
        record_id: LoginRecordId,
        session_token: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        if !self.multisite || user.is_super_admin {
            return Ok(());
        }
        if self.directory.is_member_of_blog(user.id, blog_id).await? {
            return Ok(());
        }
        let network = self.settings.network().await;
        if !network.block_user {
            return Ok(());
        }

        if let Err(err) = self
            .repo
            .close_session(record_id, LoginStatus::Block, now)
            .await
        {
            tracing::error!(record_id = record_id.0, error = %err, "failed to save blocked login");
        }
        if let Err(err) = self.pointers.remove(session_token).await {
            tracing::error!(record_id = record_id.0, error = %err, "failed to drop session pointer");
        }

        tracing::info!(
            record_id = record_id.0,
            user_id = %user.id,
            blog_id = blog_id.0,
            "blocked login on non-member site"
        );
        Err(ApplicationError::blocked(network.block_user_message))
    }
}
