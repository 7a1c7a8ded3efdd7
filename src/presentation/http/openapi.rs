// src/presentation/http/openapi.rs
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, env, fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub const DEFAULT_SNAPSHOT_PATH: &str = "spec/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::tracker::record_login,
        crate::presentation::http::controllers::tracker::record_failed_login,
        crate::presentation::http::controllers::tracker::heartbeat,
        crate::presentation::http::controllers::tracker::record_logout,
        crate::presentation::http::controllers::login_history::list_login_history,
        crate::presentation::http::controllers::login_history::export_login_history,
        crate::presentation::http::controllers::login_history::list_columns,
        crate::presentation::http::controllers::login_history::bulk_action,
        crate::presentation::http::controllers::login_history::delete_login_record,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::tracker::LoginRequest,
            crate::presentation::http::controllers::tracker::FailedLoginRequest,
            crate::presentation::http::controllers::tracker::HeartbeatRequest,
            crate::presentation::http::controllers::tracker::LogoutRequest,
            crate::presentation::http::controllers::tracker::RecordedResponse,
            crate::presentation::http::controllers::tracker::HeartbeatResponse,
            crate::presentation::http::controllers::tracker::LogoutResponse,
            crate::presentation::http::controllers::login_history::BulkRequest,
            crate::presentation::http::controllers::login_history::DeletedResponse,
            crate::application::dto::LoginHistoryListDto,
            crate::application::dto::LoginHistoryRowDto,
            crate::application::dto::CellDto,
            crate::application::dto::ColumnDto,
            crate::application::dto::ColumnsDto,
            crate::application::dto::BulkActionDto,
            crate::domain::login::LoginStatus,
            crate::domain::login::PresenceStatus
        )
    ),
    tags(
        (name = "Tracker", description = "Login lifecycle callbacks"),
        (name = "LoginHistory", description = "Login history list, export and cleanup"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("bearerAuth" = [])),
    info(
        title = "Login History API",
        description = "Records user logins and serves the admin login history table",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("Biscuit".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));

        let servers = openapi.servers.get_or_insert_with(Vec::new);
        servers.clear();

        let mut urls: Vec<String> = env::var("PUBLIC_API_URLS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.trim_end_matches('/').to_string())
                    .collect()
            })
            .unwrap_or_default();

        if urls.is_empty() {
            urls.push("http://localhost:8080".to_string());
        }

        let mut seen = HashSet::new();
        for url in urls {
            if seen.insert(url.clone()) {
                servers.push(Server::new(url));
            }
        }
    }
}

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .merge(swagger)
        .merge(redoc)
        .route("/", get(|| async { Redirect::permanent("/docs") }))
}

/// Writes the document to `OPENAPI_SNAPSHOT_PATH` (or the default path) and
/// returns where it went.
pub fn write_openapi_snapshot() -> std::io::Result<String> {
    let spec = ApiDoc::openapi();
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(output_path)
}
