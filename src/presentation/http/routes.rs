// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{login_history, tracker},
    middleware::rate_limit::tracker_rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Router with the tracker rate limit in place.
pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    build_router_with_rate_limiter(state, allowed_origins, true)
}

/// The rate limiter keys on the client address, which in-process test requests
/// do not carry; tests build the router without it.
pub fn build_router_with_rate_limiter(
    state: HttpState,
    allowed_origins: &[String],
    rate_limit: bool,
) -> Router {
    let mut tracker_routes = Router::new()
        .route("/api/v1/tracker/login", post(tracker::record_login))
        .route(
            "/api/v1/tracker/login-failed",
            post(tracker::record_failed_login),
        )
        .route("/api/v1/tracker/heartbeat", post(tracker::heartbeat))
        .route("/api/v1/tracker/logout", post(tracker::record_logout));
    if rate_limit {
        tracker_routes = tracker_routes.layer(tracker_rate_limit_layer());
    }

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .merge(tracker_routes)
        .route(
            "/api/v1/login-history",
            get(login_history::list_login_history),
        )
        .route(
            "/api/v1/login-history/export",
            get(login_history::export_login_history),
        )
        .route(
            "/api/v1/login-history/columns",
            get(login_history::list_columns),
        )
        .route(
            "/api/v1/login-history/bulk",
            post(login_history::bulk_action),
        )
        .route(
            "/api/v1/login-history/{id}",
            delete(login_history::delete_login_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
