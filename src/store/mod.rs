//! Storage handle contract
//!
//! The query engine depends only on [`RecordStore`], not on any specific
//! engine: a backend must be able to execute a composed [`SelectQuery`]
//! (conjunctive predicates on named columns, relation join/eager-load by
//! name, ordering, offset/limit, count) and to create/find/save/soft-delete
//! records by id. [`memory::MemoryStore`] is the reference backend.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::core::record::{Record, Relation};
use crate::query::compose::SelectQuery;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("failed to decode record: {0}")]
    Decode(String),
}

/// Result of executing a composed query: one page of documents plus the
/// total count of records matching the predicate before pagination.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub records: Vec<Value>,
    pub total: u64,
}

/// CRUD and query execution for one record type.
///
/// Select/find return serialized documents so eager-loaded relations can
/// be embedded without widening the record type; get returns the typed
/// record for flows that modify it. All read paths exclude soft-deleted
/// records unless the query says otherwise.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Execute a composed query.
    async fn select(&self, query: &SelectQuery) -> Result<QueryResult, StorageError>;

    /// Fetch one live record by id as a document, with relations embedded.
    async fn find(
        &self,
        id: Uuid,
        expand: &[&'static Relation],
    ) -> Result<Option<Value>, StorageError>;

    /// Fetch one live record by id as the typed record.
    async fn get(&self, id: Uuid) -> Result<Option<T>, StorageError>;

    /// Persist a new record. The store assigns id and timestamps.
    async fn insert(&self, record: T) -> Result<T, StorageError>;

    /// Persist changes to an existing record, stamping `updated_at`.
    async fn save(&self, record: T) -> Result<T, StorageError>;

    /// Mark the record as deleted. A missing or already-deleted id is a
    /// no-op, making deletion idempotent.
    async fn soft_delete(&self, id: Uuid) -> Result<(), StorageError>;
}
