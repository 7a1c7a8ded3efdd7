use super::LoginTracker;
use crate::application::{dto::AuthenticatedUser, error::ApplicationResult};
use crate::domain::user::UserId;

impl LoginTracker {
    /// Refreshes `time_last_seen` of the session's login row.
    /// Returns the number of rows updated; a missing user or unknown session
    /// updates nothing.
    pub async fn touch_last_seen(
        &self,
        actor: &AuthenticatedUser,
        session_token: &str,
        user_id: Option<UserId>,
    ) -> ApplicationResult<u64> {
        self.ensure_writer(actor)?;
        let Some(user_id) = user_id else {
            return Ok(0);
        };
        let pointer = match self.pointers.get(session_token).await {
            Ok(Some(pointer)) => pointer,
            Ok(None) => return Ok(0),
            Err(err) => {
                tracing::error!(error = %err, "failed to read session pointer");
                return Ok(0);
            }
        };
        if pointer.user_id() != user_id {
            return Ok(0);
        }

        match self
            .repo
            .touch_last_seen(pointer.record_id(), user_id, self.clock.now())
            .await
        {
            Ok(updated) => Ok(updated),
            Err(err) => {
                tracing::error!(record_id = pointer.record_id, error = %err, "failed to update last seen");
                Ok(0)
            }
        }
    }
}
