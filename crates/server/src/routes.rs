pub mod auth;
pub mod certificates;
pub mod requests;
pub mod tenant;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, admin and tenant routes plus API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    // Admin routes: token verified globally, role checked here
    let admin = Router::new()
        .route("/admin/certificates", get(certificates::list).post(certificates::create))
        .route("/admin/certificates/download", get(certificates::download))
        .route(
            "/admin/certificates/:id",
            put(certificates::update).patch(certificates::update).delete(certificates::delete),
        )
        .route("/admin/certificates/:id/revoke", post(certificates::revoke))
        .route("/admin/certificate-requests", get(requests::list).post(requests::create))
        .route("/admin/certificate-requests/:id/approve", post(requests::approve))
        .route("/admin/certificate-requests/:id/reject", post(requests::reject))
        .route_layer(middleware::from_fn(auth::require_admin));

    // Tenant routes act on the caller's own records
    let tenant = Router::new()
        .route("/tenant/certificate-requests", post(tenant::create_request).get(tenant::my_requests))
        .route("/tenant/certificate", get(tenant::my_certificate));

    public
        .merge(admin)
        .merge(tenant)
        .with_state(state.clone())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, auth::require_bearer_token_state))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
