use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::api::DocumentStore;
use crate::errors::StoreError;
use crate::model::{Collection, Database, Document, Payload};
use crate::storage::json_file::JsonFileStore;

/// 文件存储：`users` 与 `records` 两个集合持久化在同一个 JSON 文件中
#[derive(Clone)]
pub struct DocumentDb {
    store: Arc<JsonFileStore<Database>>,
}

impl DocumentDb {
    /// 打开存储；文件缺失或无法解析时以空库启动，绝不阻止服务启动
    pub async fn open<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonFileStore::<Database>::open(path).await;
        Arc::new(Self { store })
    }

    /// 列出集合内全部文档
    pub async fn list(&self, collection: Collection) -> Vec<Document> {
        self.store.read(|db| db.collection(collection).to_vec()).await
    }

    /// 根据 id 获取单个文档
    pub async fn get(&self, collection: Collection, id: &str) -> Option<Document> {
        self.store
            .read(|db| db.collection(collection).iter().find(|d| d.id == id).cloned())
            .await
    }

    /// 创建新文档：id 由服务端生成，payload 自带的 id 会被丢弃
    pub async fn insert(&self, collection: Collection, payload: Payload) -> Result<Document, StoreError> {
        let doc = Document::from_payload(Uuid::new_v4().to_string(), payload);
        let doc = self
            .store
            .commit(move |db| {
                db.collection_mut(collection).push(doc.clone());
                Ok(doc)
            })
            .await?;
        debug!(collection = collection.as_str(), id = %doc.id, "document inserted");
        Ok(doc)
    }

    /// 更新指定文档（浅合并）：payload 顶层键覆盖同名字段，id 不变
    pub async fn update(&self, collection: Collection, id: &str, payload: Payload) -> Result<Document, StoreError> {
        let doc = self
            .store
            .commit(move |db| {
                let doc = db
                    .collection_mut(collection)
                    .iter_mut()
                    .find(|d| d.id == id)
                    .ok_or_else(|| StoreError::not_found(collection.singular()))?;
                doc.merge(payload);
                Ok(doc.clone())
            })
            .await?;
        debug!(collection = collection.as_str(), id = %doc.id, "document updated");
        Ok(doc)
    }

    /// 删除指定文档；不存在时返回 NotFound 且不触发落盘
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.store
            .commit(move |db| {
                let col = db.collection_mut(collection);
                let index = col
                    .iter()
                    .position(|d| d.id == id)
                    .ok_or_else(|| StoreError::not_found(collection.singular()))?;
                col.remove(index);
                Ok(())
            })
            .await?;
        debug!(collection = collection.as_str(), id, "document deleted");
        Ok(())
    }

    /// 底层数据文件路径
    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

#[async_trait::async_trait]
impl DocumentStore for DocumentDb {
    async fn list(&self, collection: Collection) -> Vec<Document> { self.list(collection).await }
    async fn get(&self, collection: Collection, id: &str) -> Option<Document> { self.get(collection, id).await }
    async fn insert(&self, collection: Collection, payload: Payload) -> Result<Document, StoreError> { self.insert(collection, payload).await }
    async fn update(&self, collection: Collection, id: &str, payload: Payload) -> Result<Document, StoreError> { self.update(collection, id, payload).await }
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> { self.delete(collection, id).await }
}
