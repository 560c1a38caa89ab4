//! Backing store trait definition.

use crate::error::StoreResult;
use crate::filter::Filter;
use crate::index::IndexSpec;
use crate::options::FindOptions;
use async_trait::async_trait;
use modelkit_codec::{DocumentId, Fields, RawDocument};

/// The capability set a document database exposes to model handles.
///
/// Stores own everything about persistence: identifier assignment,
/// versioning, unique enforcement, ordering of concurrent writes, and
/// batch semantics. Callers only describe what they want.
///
/// # Invariants
///
/// - Every write is atomic per document; a rejected write changes nothing
/// - `find` without a sort returns documents in insertion order
/// - `find_by_id_and_update` returns the document *after* the patch
/// - `find_by_id_and_delete` returns the document *before* removal
/// - `count_documents` is exact; `estimated_count` may be served from metadata
/// - Operations on a disconnected store fail with
///   [`crate::StoreError::NotConnected`]
///
/// # Implementors
///
/// - [`crate::MemoryStore`] - embedded store for tests and ephemeral data
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens the connection.
    async fn connect(&self) -> StoreResult<()>;

    /// Closes the connection. Stored data is kept.
    async fn disconnect(&self) -> StoreResult<()>;

    /// Returns true if operations can be served.
    fn is_connected(&self) -> bool;

    /// Registers a collection and its unique indexes.
    ///
    /// Idempotent. Indexes not yet present are built over existing
    /// documents.
    async fn ensure_collection(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()>;

    /// Returns matching documents shaped by `options`.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<RawDocument>>;

    /// Returns the first matching document in insertion order.
    async fn find_one(&self, collection: &str, filter: &Filter)
        -> StoreResult<Option<RawDocument>>;

    /// Returns the document with the given identifier.
    async fn find_by_id(&self, collection: &str, id: DocumentId)
        -> StoreResult<Option<RawDocument>>;

    /// Inserts one document, assigning its identifier.
    async fn insert_one(&self, collection: &str, fields: Fields) -> StoreResult<RawDocument>;

    /// Inserts a batch, returning documents in input order.
    async fn insert_many(
        &self,
        collection: &str,
        batch: Vec<Fields>,
    ) -> StoreResult<Vec<RawDocument>>;

    /// Applies `patch` to a document and returns the updated document.
    ///
    /// Returns `None` if no document has the identifier.
    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: Fields,
    ) -> StoreResult<Option<RawDocument>>;

    /// Removes a document and returns it as it was.
    ///
    /// Returns `None` if no document has the identifier.
    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<RawDocument>>;

    /// Removes every matching document, returning how many were removed.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Counts matching documents exactly.
    async fn count_documents(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Counts all documents from collection metadata.
    async fn estimated_count(&self, collection: &str) -> StoreResult<u64>;

    /// Drops every document of a collection.
    ///
    /// Registered unique indexes survive the drop, emptied, so models bound
    /// to the collection keep their constraints. Returns false if the
    /// collection did not exist.
    async fn drop_collection(&self, collection: &str) -> StoreResult<bool>;
}
