use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::CollectionService;

use crate::openapi::ApiDoc;

pub mod history;
pub mod requests;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub collections: Arc<CollectionService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, OpenAPI document, requests and history.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // 公共路由：健康检查与 OpenAPI 文档
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // requests 集合：完整 CRUD
    let request_routes = Router::new()
        .route(
            "/api/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route(
            "/api/requests/:id",
            get(requests::get_request)
                .put(requests::update_request)
                .delete(requests::delete_request),
        );

    // history 集合：无单条查询/更新，DELETE /api/history 清空全部
    let history_routes = Router::new()
        .route(
            "/api/history",
            get(history::list_history)
                .post(history::create_history)
                .delete(history::clear_history),
        )
        .route("/api/history/:id", delete(history::delete_history));

    public
        .merge(request_routes)
        .merge(history_routes)
        .with_state(state)
        // CORS 放在 Trace 之内，预检请求同样会被记录
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
