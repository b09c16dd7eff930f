use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};

/// Postgres-backed store. Documents live in a single `documents` table
/// as JSONB rows keyed by `(collection, id)`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(backend)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT doc FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn put(&self, collection: &str, id: Uuid, doc: Value) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO documents (collection, id, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
        )
        .bind(collection)
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        sqlx::query_scalar::<_, Value>("SELECT doc FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)
    }

    async fn find_eq(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Vec<Value>> {
        // Containment form, the shape the jsonb_path_ops index serves;
        // callers filter on top-level scalar fields only.
        sqlx::query_scalar::<_, Value>(
            "SELECT doc FROM documents WHERE collection = $1 \
             AND doc @> jsonb_build_object($2::text, $3)",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
