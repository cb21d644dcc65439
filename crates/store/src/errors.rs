use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persist(String),
}

impl StoreError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(entity.to_string()) }
}
