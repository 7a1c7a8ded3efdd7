use super::LoginTracker;
use crate::application::{dto::AuthenticatedUser, error::ApplicationResult};
use crate::domain::login::LoginStatus;

impl LoginTracker {
    /// Closes the session's login row and forgets the session.
    /// Returns whether a session was known for the token.
    pub async fn record_logout(
        &self,
        actor: &AuthenticatedUser,
        session_token: &str,
    ) -> ApplicationResult<bool> {
        self.ensure_writer(actor)?;
        let pointer = match self.pointers.get(session_token).await {
            Ok(Some(pointer)) => pointer,
            Ok(None) => return Ok(false),
            Err(err) => {
                tracing::error!(error = %err, "failed to read session pointer");
                return Ok(false);
            }
        };

        if let Err(err) = self
            .repo
            .close_session(pointer.record_id(), LoginStatus::Logout, self.clock.now())
            .await
        {
            tracing::error!(record_id = pointer.record_id, error = %err, "failed to save logout");
        }
        if let Err(err) = self.pointers.remove(session_token).await {
            tracing::error!(record_id = pointer.record_id, error = %err, "failed to drop session pointer");
        }

        tracing::debug!(record_id = pointer.record_id, "saved logout");
        Ok(true)
    }
}
