use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::{ApiInfo, Health};

pub mod documents;

use documents::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// 根路由：返回服务横幅与当前时间戳
pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Car Maintenance API is running!",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Build the full application router, including banner, health, and document CRUD
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    // Public routes (banner + health)
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    // Document routes, one table shared by every collection
    let api = Router::new()
        .route(
            "/:collection",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/:collection/:id",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        );

    // Compose
    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 请求到达时打点
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
