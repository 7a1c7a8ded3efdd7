use crate::application::{
    dto::{AuthenticatedUser, ListScope},
    error::{ApplicationError, ApplicationResult},
};

pub const PER_PAGE: u32 = 20;
pub const NO_ITEMS_MESSAGE: &str = "No records available.";

pub(super) fn ensure_read_capability(actor: &AuthenticatedUser) -> ApplicationResult<()> {
    if actor.has_capability("login_history", "read") {
        Ok(())
    } else {
        Err(ApplicationError::forbidden("missing capability login_history:read"))
    }
}

/// Network scope needs `network:manage`; everyone else sees their own site.
pub fn resolve_scope(actor: &AuthenticatedUser, wants_network: bool) -> ApplicationResult<ListScope> {
    if !wants_network {
        return Ok(ListScope::Site(actor.blog_id));
    }
    if actor.can_manage_network() {
        Ok(ListScope::Network)
    } else {
        Err(ApplicationError::forbidden("missing capability network:manage"))
    }
}
