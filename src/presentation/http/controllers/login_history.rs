// src/presentation/http/controllers/login_history.rs
use crate::application::{
    commands::login_history::{BulkAction, BulkDeleteCommand},
    dto::{ColumnsDto, LoginHistoryListDto},
    queries::login_history::{CsvExport, LoginHistoryParams},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScopeParams {
    /// `network` for the network-wide table.
    #[serde(default)]
    pub scope: Option<String>,
}

impl ScopeParams {
    fn is_network(&self) -> bool {
        self.scope.as_deref().map(str::trim) == Some("network")
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkRequest {
    /// `bulk-delete` or `bulk-delete-all`.
    pub action: String,
    #[serde(default)]
    pub ids: Vec<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/login-history",
    params(LoginHistoryParams),
    responses(
        (status = 200, description = "One page of login history.", body = LoginHistoryListDto),
        (status = 400, description = "Invalid filter value.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "LoginHistory"
)]
pub async fn list_login_history(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Query(params): Query<LoginHistoryParams>,
) -> HttpResult<Json<LoginHistoryListDto>> {
    state
        .services
        .login_history_queries
        .list(&actor, params)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/login-history/export",
    params(LoginHistoryParams),
    responses(
        (status = 200, description = "Semicolon separated CSV attachment.", content_type = "text/csv", body = String),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "LoginHistory"
)]
pub async fn export_login_history(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Query(params): Query<LoginHistoryParams>,
) -> HttpResult<Response> {
    let export = state
        .services
        .login_history_queries
        .export_csv(&actor, params)
        .await
        .into_http()?;
    Ok(csv_attachment(export))
}

fn csv_attachment(export: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    let mut response = export.body.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CsvExport::CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[utoipa::path(
    get,
    path = "/api/v1/login-history/columns",
    params(ScopeParams),
    responses(
        (status = 200, description = "Printable columns, sortable keys and bulk actions.", body = ColumnsDto)
    ),
    security(("bearerAuth" = [])),
    tag = "LoginHistory"
)]
pub async fn list_columns(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Query(params): Query<ScopeParams>,
) -> HttpResult<Json<ColumnsDto>> {
    state
        .services
        .login_history_queries
        .columns(&actor, params.is_network())
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/login-history/bulk",
    request_body = BulkRequest,
    responses(
        (status = 200, description = "Rows deleted.", body = DeletedResponse),
        (status = 400, description = "Unknown action or id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "LoginHistory"
)]
pub async fn bulk_action(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<BulkRequest>,
) -> HttpResult<Json<DeletedResponse>> {
    let action = payload.action.parse::<BulkAction>().into_http()?;
    let network = ScopeParams {
        scope: payload.scope,
    }
    .is_network();

    state
        .services
        .login_history_commands
        .bulk(
            &actor,
            BulkDeleteCommand {
                action,
                ids: payload.ids,
                network,
            },
        )
        .await
        .into_http()
        .map(|deleted| Json(DeletedResponse { deleted }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/login-history/{id}",
    params(
        ("id" = i64, Path, description = "Login record id"),
        ScopeParams
    ),
    responses(
        (status = 200, description = "Row deleted (or already gone).", body = DeletedResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "LoginHistory"
)]
pub async fn delete_login_record(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
    Query(params): Query<ScopeParams>,
) -> HttpResult<Json<DeletedResponse>> {
    state
        .services
        .login_history_commands
        .delete_rows(&actor, &[id], params.is_network())
        .await
        .into_http()
        .map(|deleted| Json(DeletedResponse { deleted }))
}
