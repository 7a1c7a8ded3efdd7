use chrono::Duration;
use login_history::application::commands::tracker::{ClientInfo, FailedLoginEvent, LoginEvent};
use login_history::application::error::ApplicationError;
use login_history::application::ports::session::SessionPointerStore;
use login_history::application::ports::settings::DEFAULT_BLOCK_USER_MESSAGE;
use login_history::domain::login::{BlogId, LoginStatus};
use login_history::domain::user::UserId;
use serde_json::json;

mod support;

use std::sync::Arc;
use support::{
    FixedGeoLocator, InMemorySettings, READER_TOKEN, TRACKER_TOKEN, TestContext,
    UnavailablePointerStore, actor_for, fixed_now, make_context,
};

const FIREFOX_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

fn login(user_id: i64, session_token: &str) -> LoginEvent {
    LoginEvent {
        user_id: UserId(user_id),
        username: String::new(),
        session_token: session_token.into(),
        client: ClientInfo {
            ip_address: Some("203.0.113.9".into()),
            user_agent: Some(FIREFOX_LINUX.into()),
        },
    }
}

fn blocking_context() -> TestContext {
    TestContext::builder()
        .multisite()
        .settings(InMemorySettings::default().with("login_history_network", json!({"block_user": "1"})))
        .build()
}

#[tokio::test]
async fn login_is_saved_with_client_details_and_session_pointer() {
    let ctx = make_context();
    let actor = actor_for(TRACKER_TOKEN);

    let id = ctx
        .services
        .tracker
        .record_login(&actor, login(5, "sess-1"))
        .await
        .unwrap()
        .expect("row saved");

    let row = ctx.repo.get(id).unwrap();
    assert_eq!(row.user_id, Some(UserId(5)));
    assert_eq!(row.username, "jane");
    assert_eq!(row.old_role.as_deref(), Some("editor,author"));
    assert_eq!(row.login_status, LoginStatus::Login);
    assert_eq!(row.blog_id, BlogId(2));
    assert_eq!(row.browser.as_deref(), Some("Firefox"));
    assert_eq!(row.browser_version.as_deref(), Some("121.0"));
    assert_eq!(row.operating_system.as_deref(), Some("Linux"));
    assert_eq!(row.geo.country_code.as_deref(), Some("DE"));
    assert_eq!(row.time_login, fixed_now());
    assert_eq!(row.time_last_seen, fixed_now());
    assert!(row.time_logout.is_none());
    assert!(!row.is_super_admin);
    assert_eq!(ctx.geo.lookups(), vec!["203.0.113.9".to_string()]);

    let pointer = ctx.pointers.get("sess-1").await.unwrap().expect("pointer kept");
    assert_eq!(pointer.record_id(), id);
    assert_eq!(pointer.user_id(), UserId(5));
    assert_eq!(pointer.blog_id, 2);
}

#[tokio::test]
async fn typed_username_is_kept_over_directory_name() {
    let ctx = make_context();
    let mut event = login(5, "sess-typed");
    event.username = "jane@example.com".into();

    let id = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), event)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctx.repo.get(id).unwrap().username, "jane@example.com");
}

#[tokio::test]
async fn login_without_address_skips_geo_lookup() {
    let ctx = TestContext::builder().geo(FixedGeoLocator::unavailable()).build();
    let mut event = login(5, "sess-2");
    event.client = ClientInfo::default();

    let id = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), event)
        .await
        .unwrap()
        .unwrap();

    let row = ctx.repo.get(id).unwrap();
    assert!(row.ip_address.is_none());
    assert!(row.browser.is_none());
    assert!(row.geo.country_name.is_none());
    assert!(ctx.geo.lookups().is_empty());
}

#[tokio::test]
async fn login_rejects_missing_token_unknown_user_and_foreign_callers() {
    let ctx = make_context();
    let tracker = &ctx.services.tracker;

    let err = tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(5, "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let err = tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(99, "sess-3"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));

    let err = tracker
        .record_login(&actor_for(READER_TOKEN), login(5, "sess-3"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    assert_eq!(ctx.repo.len(), 0);
}

#[tokio::test]
async fn failed_save_is_reported_without_pointer() {
    let ctx = make_context();
    ctx.repo.fail_writes();

    let saved = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(5, "sess-4"))
        .await
        .unwrap();

    assert!(saved.is_none());
    assert!(ctx.pointers.get("sess-4").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_attempt_has_no_user_and_no_session() {
    let ctx = make_context();
    let id = ctx
        .services
        .tracker
        .record_failed_login(
            &actor_for(TRACKER_TOKEN),
            FailedLoginEvent {
                username: "ghost".into(),
                client: ClientInfo {
                    ip_address: Some("198.51.100.7".into()),
                    user_agent: None,
                },
            },
        )
        .await
        .unwrap()
        .unwrap();

    let row = ctx.repo.get(id).unwrap();
    assert_eq!(row.login_status, LoginStatus::Fail);
    assert_eq!(row.username, "ghost");
    assert!(row.user_id.is_none());
    assert!(row.session_token.is_empty());
    assert!(row.old_role.is_none());
    assert_eq!(row.geo.country_name.as_deref(), Some("Germany"));
}

#[tokio::test]
async fn heartbeat_moves_last_seen_for_the_session_owner_only() {
    let ctx = make_context();
    let actor = actor_for(TRACKER_TOKEN);
    let tracker = &ctx.services.tracker;
    let id = tracker
        .record_login(&actor, login(5, "sess-5"))
        .await
        .unwrap()
        .unwrap();

    ctx.clock.advance(Duration::minutes(5));
    assert_eq!(tracker.touch_last_seen(&actor, "sess-5", Some(UserId(5))).await.unwrap(), 1);
    assert_eq!(
        ctx.repo.get(id).unwrap().time_last_seen,
        fixed_now() + Duration::minutes(5)
    );

    ctx.clock.advance(Duration::minutes(5));
    assert_eq!(tracker.touch_last_seen(&actor, "sess-5", Some(UserId(7))).await.unwrap(), 0);
    assert_eq!(tracker.touch_last_seen(&actor, "unknown", Some(UserId(5))).await.unwrap(), 0);
    assert_eq!(
        ctx.repo.get(id).unwrap().time_last_seen,
        fixed_now() + Duration::minutes(5)
    );
}

#[tokio::test]
async fn logout_closes_the_row_and_forgets_the_session() {
    let ctx = make_context();
    let actor = actor_for(TRACKER_TOKEN);
    let tracker = &ctx.services.tracker;
    let id = tracker
        .record_login(&actor, login(5, "sess-6"))
        .await
        .unwrap()
        .unwrap();

    ctx.clock.advance(Duration::minutes(42));
    assert!(tracker.record_logout(&actor, "sess-6").await.unwrap());

    let row = ctx.repo.get(id).unwrap();
    let logout_at = fixed_now() + Duration::minutes(42);
    assert_eq!(row.login_status, LoginStatus::Logout);
    assert_eq!(row.time_logout, Some(logout_at));
    assert_eq!(row.time_last_seen, logout_at);
    assert!(ctx.pointers.get("sess-6").await.unwrap().is_none());

    assert!(!tracker.record_logout(&actor, "sess-6").await.unwrap());
}

#[tokio::test]
async fn non_member_is_blocked_on_network_site() {
    let ctx = blocking_context();

    // bob only belongs to blog 1; the tracker acts for blog 2
    let err = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(7, "sess-7"))
        .await
        .unwrap_err();

    match err {
        ApplicationError::Blocked(message) => assert_eq!(message, DEFAULT_BLOCK_USER_MESSAGE),
        other => panic!("expected blocked login, got {other:?}"),
    }

    let ids = ctx.repo.ids();
    assert_eq!(ids.len(), 1);
    let row = ctx.repo.get(login_history::domain::login::LoginRecordId(ids[0])).unwrap();
    assert_eq!(row.login_status, LoginStatus::Block);
    assert_eq!(row.time_logout, Some(fixed_now()));
    assert!(ctx.pointers.get("sess-7").await.unwrap().is_none());
}

#[tokio::test]
async fn block_message_comes_from_network_settings() {
    let ctx = TestContext::builder()
        .multisite()
        .settings(InMemorySettings::default().with(
            "login_history_network",
            json!({"block_user": true, "block_user_message": "Members only."}),
        ))
        .build();

    let err = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(7, "sess-8"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Members only.");
}

#[tokio::test]
async fn members_and_super_admins_pass_the_block() {
    let ctx = blocking_context();
    let actor = actor_for(TRACKER_TOKEN);

    let member = ctx
        .services
        .tracker
        .record_login(&actor, login(5, "sess-9"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctx.repo.get(member).unwrap().login_status, LoginStatus::Login);

    let admin = ctx
        .services
        .tracker
        .record_login(&actor, login(1, "sess-10"))
        .await
        .unwrap()
        .unwrap();
    let row = ctx.repo.get(admin).unwrap();
    assert_eq!(row.login_status, LoginStatus::Login);
    assert!(row.is_super_admin);
}

#[tokio::test]
async fn block_needs_multisite_and_the_setting() {
    let single = TestContext::builder()
        .settings(InMemorySettings::default().with("login_history_network", json!({"block_user": true})))
        .build();
    let saved = single
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(7, "sess-11"))
        .await
        .unwrap()
        .unwrap();
    let row = single.repo.get(saved).unwrap();
    assert_eq!(row.login_status, LoginStatus::Login);
    // super admin flag is only meaningful on a network
    assert!(!row.is_super_admin);

    let network_without_block = TestContext::builder().multisite().build();
    assert!(network_without_block
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(7, "sess-12"))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn block_still_applies_when_the_pointer_store_is_down() {
    let store = Arc::new(UnavailablePointerStore::default());
    let ctx = TestContext::builder()
        .multisite()
        .settings(InMemorySettings::default().with("login_history_network", json!({"block_user": true})))
        .pointer_store(store.clone())
        .build();

    let err = ctx
        .services
        .tracker
        .record_login(&actor_for(TRACKER_TOKEN), login(7, "sess-13"))
        .await
        .unwrap_err();
    match err {
        ApplicationError::Blocked(message) => assert_eq!(message, DEFAULT_BLOCK_USER_MESSAGE),
        other => panic!("expected blocked login, got {other:?}"),
    }
    // one failed set, one failed remove
    assert_eq!(store.calls(), 2);

    let ids = ctx.repo.ids();
    assert_eq!(ids.len(), 1);
    let row = ctx.repo.get(login_history::domain::login::LoginRecordId(ids[0])).unwrap();
    assert_eq!(row.login_status, LoginStatus::Block);
}

#[tokio::test]
async fn tracker_survives_an_unavailable_pointer_store() {
    let ctx = TestContext::builder()
        .pointer_store(Arc::new(UnavailablePointerStore::default()))
        .build();
    let actor = actor_for(TRACKER_TOKEN);
    let tracker = &ctx.services.tracker;

    let id = tracker
        .record_login(&actor, login(5, "sess-14"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctx.repo.get(id).unwrap().login_status, LoginStatus::Login);

    assert_eq!(
        tracker
            .touch_last_seen(&actor, "sess-14", Some(UserId(5)))
            .await
            .unwrap(),
        0
    );
    assert!(!tracker.record_logout(&actor, "sess-14").await.unwrap());
    assert_eq!(ctx.repo.get(id).unwrap().login_status, LoginStatus::Login);
}

#[tokio::test]
async fn heartbeat_without_user_is_a_no_op() {
    let ctx = make_context();
    let actor = actor_for(TRACKER_TOKEN);
    let tracker = &ctx.services.tracker;
    let id = tracker
        .record_login(&actor, login(5, "sess-15"))
        .await
        .unwrap()
        .unwrap();

    ctx.clock.advance(Duration::minutes(3));
    assert_eq!(tracker.touch_last_seen(&actor, "sess-15", None).await.unwrap(), 0);
    assert_eq!(ctx.repo.get(id).unwrap().time_last_seen, fixed_now());

    let reader = actor_for(READER_TOKEN);
    assert!(matches!(
        tracker.touch_last_seen(&reader, "sess-15", None).await,
        Err(ApplicationError::Forbidden(_))
    ));
}

#[tokio::test]
async fn abandoned_session_pointer_expires() {
    let ctx = make_context();
    let actor = actor_for(TRACKER_TOKEN);
    let tracker = &ctx.services.tracker;
    tracker
        .record_login(&actor, login(5, "sess-16"))
        .await
        .unwrap()
        .unwrap();

    ctx.clock
        .advance(Duration::seconds(i64::try_from(support::POINTER_TTL_SECS).unwrap()));
    assert!(ctx.pointers.get("sess-16").await.unwrap().is_none());
    assert_eq!(
        tracker
            .touch_last_seen(&actor, "sess-16", Some(UserId(5)))
            .await
            .unwrap(),
        0
    );
}
