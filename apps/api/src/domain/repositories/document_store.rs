use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level fields of a stored document
pub type Fields = Map<String, Value>;

/// A document as held by the store: its key plus its JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Errors surfaced by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Repository trait for schemaless document collections
///
/// Every call is independent and may fail on its own; implementations
/// perform no retries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Generate a fresh document id for a subsequent `set`
    fn generate_id(&self) -> String;

    /// Fetch a single document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch every document in a collection, in the store's natural order
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch documents whose top-level `field` is the string `value`
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// Write a document body under `id`, replacing any existing body
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document
    ///
    /// Fails with `StoreError::NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Delete a document; deleting an absent id is a no-op
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
