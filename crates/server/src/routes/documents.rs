use std::sync::Arc;

use axum::{extract::{Path, State}, http::StatusCode, Json};

use store::errors::StoreError;
use store::file::document_db::DocumentDb;
use store::model::{Collection, Document, Payload};

use crate::errors::JsonApiError;

/// 路由共享状态：持有文档存储实例，随 Router 一起克隆
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<DocumentDb>,
}

/// 解析路径中的集合名；未知集合一律 404
fn parse_collection(name: &str) -> Result<Collection, JsonApiError> {
    Collection::parse(name).ok_or_else(|| {
        JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("unknown collection: {}", name)),
        )
    })
}

/// 列出集合内全部文档
pub async fn list_documents(
    State(state): State<ServerState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Document>>, JsonApiError> {
    let collection = parse_collection(&collection)?;
    Ok(Json(state.store.list(collection).await))
}

/// 获取指定文档
pub async fn get_document(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Document>, StatusCode> {
    let collection = Collection::parse(&collection).ok_or(StatusCode::NOT_FOUND)?;
    match state.store.get(collection, &id).await {
        Some(doc) => Ok(Json(doc)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// 创建文档：201 返回带服务端生成 id 的完整文档
pub async fn create_document(
    State(state): State<ServerState>,
    Path(collection): Path<String>,
    Json(payload): Json<Payload>,
) -> Result<(StatusCode, Json<Document>), JsonApiError> {
    let collection = parse_collection(&collection)?;
    state.store.insert(collection, payload).await
        .map(|doc| (StatusCode::CREATED, Json(doc)))
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())))
}

/// 更新文档（浅合并）：200 返回合并后的完整文档
pub async fn update_document(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
    Json(payload): Json<Payload>,
) -> Result<Json<Document>, JsonApiError> {
    let collection = parse_collection(&collection)?;
    state.store.update(collection, &id, payload).await
        .map(Json)
        .map_err(|e| match e {
            StoreError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            _ => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())),
        })
}

/// 删除文档：成功 204 无响应体
pub async fn delete_document(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
) -> StatusCode {
    let collection = match Collection::parse(&collection) {
        Some(c) => c,
        None => return StatusCode::NOT_FOUND,
    };
    match state.store.delete(collection, &id).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
