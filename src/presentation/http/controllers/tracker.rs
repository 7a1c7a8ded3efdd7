// src/presentation/http/controllers/tracker.rs
use crate::application::commands::tracker::{ClientInfo, FailedLoginEvent, LoginEvent};
use crate::domain::user::UserId;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, ClientAddress};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub user_id: i64,
    /// Login name as typed by the user.
    #[serde(default)]
    pub username: Option<String>,
    pub session_token: String,
    /// Overrides the address derived from the request.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// The end user's agent; defaults to the request's `User-Agent`.
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FailedLoginRequest {
    pub username: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HeartbeatRequest {
    pub session_token: String,
    /// Missing or non-positive ids make the heartbeat a no-op.
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordedResponse {
    /// Id of the saved row; absent when the row could not be written.
    pub record_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HeartbeatResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    /// Whether a tracked session existed for the token.
    pub logged_out: bool,
}

fn client_info(
    ip_address: Option<String>,
    user_agent: Option<String>,
    address: ClientAddress,
    headers: &HeaderMap,
) -> ClientInfo {
    let ip_address = ip_address
        .filter(|ip| !ip.trim().is_empty())
        .or(address.0);
    let user_agent = user_agent.or_else(|| {
        headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    });
    ClientInfo {
        ip_address,
        user_agent,
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/tracker/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Login recorded.", body = RecordedResponse),
        (status = 403, description = "The user may not log in on this site.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Unknown user.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Tracker"
)]
pub async fn record_login(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    address: ClientAddress,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<(StatusCode, Json<RecordedResponse>)> {
    let user_id = UserId::new(payload.user_id)
        .map_err(|err| HttpError::bad_request(err.to_string()))?;
    let event = LoginEvent {
        user_id,
        username: payload.username.unwrap_or_default(),
        session_token: payload.session_token,
        client: client_info(payload.ip_address, payload.user_agent, address, &headers),
    };

    let record_id = state
        .services
        .tracker
        .record_login(&actor, event)
        .await
        .into_http()?;

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            record_id: record_id.map(i64::from),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracker/login-failed",
    request_body = FailedLoginRequest,
    responses(
        (status = 201, description = "Failed attempt recorded.", body = RecordedResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Tracker"
)]
pub async fn record_failed_login(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    address: ClientAddress,
    headers: HeaderMap,
    Json(payload): Json<FailedLoginRequest>,
) -> HttpResult<(StatusCode, Json<RecordedResponse>)> {
    let event = FailedLoginEvent {
        username: payload.username,
        client: client_info(payload.ip_address, payload.user_agent, address, &headers),
    };

    let record_id = state
        .services
        .tracker
        .record_failed_login(&actor, event)
        .await
        .into_http()?;

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            record_id: record_id.map(i64::from),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracker/heartbeat",
    request_body = HeartbeatRequest,
    responses(
        (status = 200, description = "Last-seen refreshed.", body = HeartbeatResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Tracker"
)]
pub async fn heartbeat(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<HeartbeatRequest>,
) -> HttpResult<Json<HeartbeatResponse>> {
    let user_id = payload.user_id.and_then(|id| UserId::new(id).ok());

    state
        .services
        .tracker
        .touch_last_seen(&actor, &payload.session_token, user_id)
        .await
        .into_http()
        .map(|updated| Json(HeartbeatResponse { updated }))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracker/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Session closed.", body = LogoutResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Tracker"
)]
pub async fn record_logout(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<LogoutRequest>,
) -> HttpResult<Json<LogoutResponse>> {
    state
        .services
        .tracker
        .record_logout(&actor, &payload.session_token)
        .await
        .into_http()
        .map(|logged_out| Json(LogoutResponse { logged_out }))
}
