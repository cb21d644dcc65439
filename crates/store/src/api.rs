use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::{Collection, Document, Payload};

/// Trait abstraction for document storage (CRUD over named collections).
/// Implementations can be file-backed, database-backed, or remote.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: Collection) -> Vec<Document>;
    async fn get(&self, collection: Collection, id: &str) -> Option<Document>;
    async fn insert(&self, collection: Collection, payload: Payload) -> Result<Document, StoreError>;
    async fn update(&self, collection: Collection, id: &str, payload: Payload) -> Result<Document, StoreError>;
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}
