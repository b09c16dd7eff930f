//! Document persistence.
//!
//! Entities are stored as schemaless JSON documents grouped in named
//! collections and addressed by UUID. Writes are whole-document upserts
//! with last-write-wins semantics; there are no cross-document
//! transactions. Two backends exist: an in-memory map for tests and
//! local development, and Postgres JSONB for real deployments.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database failed or rejected the operation.
    #[error("storage backend: {0}")]
    Backend(String),
    /// A value could not be serialized into a document.
    #[error("document encode: {0}")]
    Encode(#[source] serde_json::Error),
    /// A stored document no longer matches the expected shape.
    #[error("document decode: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Raw operations every backend provides. Typed access goes through
/// [`DocumentStoreExt`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>>;

    /// Insert or fully replace a document.
    async fn put(&self, collection: &str, id: Uuid, doc: Value) -> StoreResult<()>;

    /// Delete by id; `false` when the document was not there.
    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool>;

    /// Every document in a collection, in no particular order.
    async fn all(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_eq(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Vec<Value>>;
}

/// A persisted entity: knows which collection it lives in and its own id.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Typed convenience layer over the raw [`DocumentStore`] surface.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    async fn load<T: Document>(&self, id: Uuid) -> StoreResult<Option<T>> {
        match self.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc).map_err(StoreError::Decode)?)),
            None => Ok(None),
        }
    }

    async fn save<T: Document>(&self, entity: &T) -> StoreResult<()> {
        let doc = serde_json::to_value(entity).map_err(StoreError::Encode)?;
        self.put(T::COLLECTION, entity.id(), doc).await
    }

    async fn remove<T: Document>(&self, id: Uuid) -> StoreResult<bool> {
        self.delete(T::COLLECTION, id).await
    }

    async fn list_all<T: Document>(&self) -> StoreResult<Vec<T>> {
        self.all(T::COLLECTION)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::Decode))
            .collect()
    }

    /// All entities whose top-level string `field` equals `value`.
    async fn find_by<T: Document>(&self, field: &str, value: &str) -> StoreResult<Vec<T>> {
        self.find_eq(T::COLLECTION, field, &Value::String(value.to_owned()))
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::Decode))
            .collect()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
