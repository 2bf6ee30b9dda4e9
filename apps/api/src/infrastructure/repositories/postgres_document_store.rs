use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{Document, DocumentStore, Fields, StoreError};

/// PostgreSQL implementation of DocumentStore
///
/// Documents live in a single JSONB table keyed by `(collection, id)`;
/// see `schema.sql`.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(id: String, data: Value) -> Result<Document, StoreError> {
    match data {
        Value::Object(fields) => Ok(Document::new(id, fields)),
        other => Err(StoreError::Backend(format!(
            "Document {} is not a JSON object: {}",
            id, other
        ))),
    }
}

fn into_documents(rows: Vec<(String, Json<Value>)>) -> Result<Vec<Document>, StoreError> {
    rows.into_iter()
        .map(|(id, Json(data))| into_document(id, data))
        .collect()
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            r#"
            SELECT data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to get document: {}", e)))?;

        row.map(|(Json(data),)| into_document(id.to_string(), data))
            .transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to list documents: {}", e)))?;

        into_documents(rows)
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data ->> $2 = $3
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to query documents: {}", e)))?;

        into_documents(rows)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET
                data = EXCLUDED.data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to set document: {}", e)))?;

        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to update document: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM documents WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Failed to delete document: {}", e)))?;

        Ok(())
    }
}
