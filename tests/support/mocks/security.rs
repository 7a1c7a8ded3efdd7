// tests/support/mocks/security.rs
use async_trait::async_trait;
use chrono::Duration;
use login_history::application::{
    ApplicationResult,
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
    error::ApplicationError,
    ports::security::TokenManager,
};
use login_history::domain::login::BlogId;
use login_history::domain::user::{Capability, UserId};
use std::collections::HashSet;

/// Main-site administrator with network rights.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Administrator of blog 2, shown in Europe/Berlin.
pub const SITE_TOKEN: &str = "site-token";
/// Login integration acting for blog 2.
pub const TRACKER_TOKEN: &str = "tracker-token";
/// Read-only viewer of the main site.
pub const READER_TOKEN: &str = "reader-token";
pub const EXPIRED_TOKEN: &str = "expired-token";

#[derive(Clone, Debug, Default)]
pub struct StaticTokenManager;

#[async_trait]
impl TokenManager for StaticTokenManager {
    async fn issue(&self, _subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        Err(ApplicationError::infrastructure("not implemented"))
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        match token {
            EXPIRED_TOKEN => Err(ApplicationError::unauthorized("expired token")),
            other => known_actor(other).ok_or_else(|| ApplicationError::unauthorized("invalid token")),
        }
    }
}

/// The user a test token stands for. Panics on unknown tokens.
pub fn actor_for(token: &str) -> AuthenticatedUser {
    known_actor(token).unwrap_or_else(|| panic!("no test actor for {token}"))
}

fn known_actor(token: &str) -> Option<AuthenticatedUser> {
    let actor = match token {
        ADMIN_TOKEN => actor(
            1,
            "admin",
            1,
            Some("UTC"),
            &[
                ("login_history", "read"),
                ("login_history", "delete"),
                ("network", "manage"),
                ("tracker", "write"),
            ],
        ),
        SITE_TOKEN => actor(
            2,
            "siteadmin",
            2,
            Some("Europe/Berlin"),
            &[("login_history", "read"), ("login_history", "delete")],
        ),
        TRACKER_TOKEN => actor(3, "gateway", 2, None, &[("tracker", "write")]),
        READER_TOKEN => actor(4, "viewer", 1, None, &[("login_history", "read")]),
        _ => return None,
    };
    Some(actor)
}

fn actor(
    id: i64,
    username: &str,
    blog_id: i64,
    timezone: Option<&str>,
    capabilities: &[(&str, &str)],
) -> AuthenticatedUser {
    let now = super::time::fixed_now();
    AuthenticatedUser {
        id: UserId::new(id).expect("invalid user id"),
        username: username.into(),
        blog_id: BlogId::new(blog_id).expect("invalid blog id"),
        timezone: timezone.map(str::to_string),
        capabilities: capabilities
            .iter()
            .map(|(resource, action)| Capability::new(*resource, *action))
            .collect::<HashSet<_>>(),
        issued_at: now,
        expires_at: now + Duration::hours(1),
    }
}
