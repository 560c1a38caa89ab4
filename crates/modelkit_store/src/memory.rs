//! In-memory document store.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::index::{IndexSpec, UniqueIndex};
use crate::options::FindOptions;
use crate::stats::{StatsSnapshot, StoreStats};
use crate::store::DocumentStore;
use async_trait::async_trait;
use modelkit_codec::{from_cbor, to_cbor, DocumentId, Fields, RawDocument, Value, ID_FIELD};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

static NULL: Value = Value::Null;

fn field_or_null<'a>(fields: &'a Fields, name: &str) -> &'a Value {
    fields.get(name).unwrap_or(&NULL)
}

#[derive(Debug)]
struct StoredDocument {
    id: DocumentId,
    version: u64,
    bytes: Vec<u8>,
}

/// Documents of one collection, in insertion order.
#[derive(Debug)]
struct CollectionState {
    next_seq: u64,
    docs: BTreeMap<u64, StoredDocument>,
    by_id: HashMap<DocumentId, u64>,
    indexes: Vec<UniqueIndex>,
}

impl CollectionState {
    fn new() -> Self {
        Self {
            next_seq: 0,
            docs: BTreeMap::new(),
            by_id: HashMap::new(),
            indexes: Vec::new(),
        }
    }

    fn push(&mut self, stored: StoredDocument) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_id.insert(stored.id, seq);
        self.docs.insert(seq, stored);
    }

    fn remove(&mut self, doc: &RawDocument) {
        if let Some(seq) = self.by_id.remove(&doc.id) {
            self.docs.remove(&seq);
        }
        for index in &mut self.indexes {
            let value = field_or_null(&doc.fields, index.field());
            index.remove(value, doc.id);
        }
    }

    fn clear(&mut self) {
        self.docs.clear();
        self.by_id.clear();
        for index in &mut self.indexes {
            index.clear();
        }
    }
}

/// An embedded, in-memory [`DocumentStore`].
///
/// This store keeps every collection in process memory and is suitable for:
/// - Unit and integration tests
/// - Ephemeral data that does not need to outlive the process
///
/// Documents are held as canonical CBOR and decoded on every read, so a
/// caller can never alias stored state.
///
/// # Thread Safety
///
/// All state sits behind one `RwLock`. Every operation holds the lock for
/// its whole duration, so each write is atomic and readers never observe a
/// half-applied batch.
///
/// # Example
///
/// ```rust
/// use modelkit_codec::Fields;
/// use modelkit_store::{DocumentStore, Filter, MemoryStore};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = MemoryStore::new();
/// store.connect().await.unwrap();
///
/// store
///     .insert_one("users", Fields::new().with("name", "Joe"))
///     .await
///     .unwrap();
/// assert_eq!(store.count_documents("users", &Filter::All).await.unwrap(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    config: StoreConfig,
    connected: AtomicBool,
    collections: RwLock<HashMap<String, CollectionState>>,
    stats: StoreStats,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a disconnected store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::open(StoreConfig::default())
    }

    /// Creates a store from configuration.
    ///
    /// The store starts connected if `connect_on_create` is set.
    #[must_use]
    pub fn open(config: StoreConfig) -> Self {
        let connected = config.connect_on_create;
        if connected {
            info!(uri = %config.uri, "memory store opened connected");
        }
        Self {
            config,
            connected: AtomicBool::new(connected),
            collections: RwLock::new(HashMap::new()),
            stats: StoreStats::new(),
        }
    }

    /// Creates a store from a `memory://<database>` URI.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConnectionUri`] if the URI is not a
    /// memory URI.
    pub fn from_uri(uri: &str) -> StoreResult<Self> {
        Ok(Self::open(StoreConfig::from_uri(uri)?))
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Names of all known collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }

    fn encode(&self, fields: &Fields) -> StoreResult<Vec<u8>> {
        let bytes = to_cbor(fields)?;
        self.stats.record_write(bytes.len() as u64);
        Ok(bytes)
    }

    fn decode(&self, stored: &StoredDocument) -> StoreResult<RawDocument> {
        let fields = from_cbor(&stored.bytes)?;
        self.stats.record_read(stored.bytes.len() as u64);
        Ok(RawDocument {
            id: stored.id,
            version: stored.version,
            fields,
        })
    }

    fn reject(&self, collection: &str, err: StoreError) -> StoreError {
        if let StoreError::DuplicateKey { field, value, .. } = &err {
            warn!(collection, field = %field, value = %value, "write rejected by unique index");
            self.stats.record_duplicate();
        }
        err
    }

    /// Matching documents in insertion order.
    fn scan(&self, state: &CollectionState, filter: &Filter) -> StoreResult<Vec<RawDocument>> {
        if let Some(id) = id_lookup(filter) {
            self.stats.record_index_lookup();
            let found = match state.by_id.get(&id).and_then(|seq| state.docs.get(seq)) {
                Some(stored) => vec![self.decode(stored)?],
                None => Vec::new(),
            };
            return Ok(found);
        }

        self.stats.record_scan();
        let mut out = Vec::new();
        for stored in state.docs.values() {
            let doc = self.decode(stored)?;
            if filter.matches(&doc) {
                out.push(doc);
            }
        }
        Ok(out)
    }
}

/// Extracts the identifier from a bare `id` equality filter.
fn id_lookup(filter: &Filter) -> Option<DocumentId> {
    match filter {
        Filter::Eq(field, Value::Text(text)) if field == ID_FIELD => text.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn connect(&self) -> StoreResult<()> {
        self.connected.store(true, Ordering::SeqCst);
        info!(uri = %self.config.uri, "memory store connected");
        Ok(())
    }

    async fn disconnect(&self) -> StoreResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        info!(uri = %self.config.uri, "memory store disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn ensure_collection(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let state = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionState::new);

        for spec in indexes {
            if state.indexes.iter().any(|i| i.spec() == spec) {
                continue;
            }
            let existing = state
                .docs
                .values()
                .map(|stored| self.decode(stored))
                .collect::<StoreResult<Vec<_>>>()?;

            let mut index = UniqueIndex::new(collection, spec.clone());
            index
                .rebuild(
                    existing
                        .iter()
                        .map(|doc| (field_or_null(&doc.fields, &spec.field), doc.id)),
                )
                .map_err(|e| self.reject(collection, e))?;

            debug!(collection, field = %spec.field, entries = index.len(), "unique index built");
            state.indexes.push(index);
        }
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<RawDocument>> {
        self.ensure_connected()?;
        let collections = self.collections.read();
        let Some(state) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let docs = options.apply(self.scan(state, filter)?);
        debug!(collection, returned = docs.len(), "find");
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Option<RawDocument>> {
        self.ensure_connected()?;
        let collections = self.collections.read();
        let Some(state) = collections.get(collection) else {
            return Ok(None);
        };

        if id_lookup(filter).is_some() {
            return Ok(self.scan(state, filter)?.into_iter().next());
        }

        self.stats.record_scan();
        for stored in state.docs.values() {
            let doc = self.decode(stored)?;
            if filter.matches(&doc) {
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<RawDocument>> {
        self.ensure_connected()?;
        let collections = self.collections.read();
        let Some(state) = collections.get(collection) else {
            return Ok(None);
        };

        self.stats.record_index_lookup();
        match state.by_id.get(&id).and_then(|seq| state.docs.get(seq)) {
            Some(stored) => Ok(Some(self.decode(stored)?)),
            None => Ok(None),
        }
    }

    async fn insert_one(&self, collection: &str, fields: Fields) -> StoreResult<RawDocument> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let state = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionState::new);

        let id = DocumentId::new();
        for index in &state.indexes {
            index
                .check(field_or_null(&fields, index.field()), id)
                .map_err(|e| self.reject(collection, e))?;
        }

        let bytes = self.encode(&fields)?;
        for index in &mut state.indexes {
            let value = field_or_null(&fields, index.field());
            index.insert(value, id)?;
        }
        state.push(StoredDocument {
            id,
            version: 0,
            bytes,
        });

        debug!(collection, %id, "inserted document");
        Ok(RawDocument::new(id, fields))
    }

    async fn insert_many(
        &self,
        collection: &str,
        batch: Vec<Fields>,
    ) -> StoreResult<Vec<RawDocument>> {
        self.ensure_connected()?;
        if batch.len() > self.config.max_batch_size {
            return Err(StoreError::BatchTooLarge {
                size: batch.len(),
                max: self.config.max_batch_size,
            });
        }

        let mut collections = self.collections.write();
        let state = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionState::new);

        let ids: Vec<DocumentId> = batch.iter().map(|_| DocumentId::new()).collect();

        // All-or-nothing: check against stored keys and within the batch first.
        for index in &state.indexes {
            let mut pending = UniqueIndex::new(collection, index.spec().clone());
            for (fields, id) in batch.iter().zip(&ids) {
                let value = field_or_null(fields, index.field());
                index
                    .check(value, *id)
                    .and_then(|()| pending.insert(value, *id))
                    .map_err(|e| self.reject(collection, e))?;
            }
        }

        let encoded = batch
            .iter()
            .map(|fields| self.encode(fields))
            .collect::<StoreResult<Vec<_>>>()?;

        let mut inserted = Vec::with_capacity(batch.len());
        for ((fields, id), bytes) in batch.into_iter().zip(ids).zip(encoded) {
            for index in &mut state.indexes {
                let value = field_or_null(&fields, index.field());
                index.insert(value, id)?;
            }
            state.push(StoredDocument {
                id,
                version: 0,
                bytes,
            });
            inserted.push(RawDocument::new(id, fields));
        }

        debug!(collection, inserted = inserted.len(), "inserted batch");
        Ok(inserted)
    }

    async fn find_by_id_and_update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: Fields,
    ) -> StoreResult<Option<RawDocument>> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(collection) else {
            return Ok(None);
        };

        self.stats.record_index_lookup();
        let Some(&seq) = state.by_id.get(&id) else {
            return Ok(None);
        };
        let Some(stored) = state.docs.get(&seq) else {
            return Ok(None);
        };

        let current = self.decode(stored)?;
        let mut updated = current.clone();
        updated.fields.merge(patch);
        updated.version += 1;

        for index in &state.indexes {
            index
                .check(field_or_null(&updated.fields, index.field()), id)
                .map_err(|e| self.reject(collection, e))?;
        }

        let bytes = self.encode(&updated.fields)?;
        for index in &mut state.indexes {
            let (old, new) = {
                let field = index.field();
                (
                    field_or_null(&current.fields, field),
                    field_or_null(&updated.fields, field),
                )
            };
            index.remove(old, id);
            index.insert(new, id)?;
        }
        state.docs.insert(
            seq,
            StoredDocument {
                id,
                version: updated.version,
                bytes,
            },
        );

        debug!(collection, %id, version = updated.version, "updated document");
        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> StoreResult<Option<RawDocument>> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(collection) else {
            return Ok(None);
        };

        self.stats.record_index_lookup();
        let Some(stored) = state.by_id.get(&id).and_then(|seq| state.docs.get(seq)) else {
            return Ok(None);
        };

        let doc = self.decode(stored)?;
        state.remove(&doc);
        self.stats.record_deletes(1);

        debug!(collection, %id, "deleted document");
        Ok(Some(doc))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let removed = if filter.is_all() {
            let count = state.docs.len() as u64;
            state.clear();
            count
        } else {
            let matching = self.scan(state, filter)?;
            for doc in &matching {
                state.remove(doc);
            }
            matching.len() as u64
        };

        self.stats.record_deletes(removed);
        debug!(collection, removed, "deleted documents");
        Ok(removed)
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.ensure_connected()?;
        let collections = self.collections.read();
        let Some(state) = collections.get(collection) else {
            return Ok(0);
        };

        if filter.is_all() {
            return Ok(state.docs.len() as u64);
        }
        Ok(self.scan(state, filter)?.len() as u64)
    }

    async fn estimated_count(&self, collection: &str) -> StoreResult<u64> {
        self.ensure_connected()?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map_or(0, |state| state.docs.len() as u64))
    }

    async fn drop_collection(&self, collection: &str) -> StoreResult<bool> {
        self.ensure_connected()?;
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let removed = state.docs.len() as u64;
        let keep_indexes = !state.indexes.is_empty();
        if keep_indexes {
            state.clear();
        } else {
            collections.remove(collection);
        }
        self.stats.record_deletes(removed);

        debug!(collection, removed, keep_indexes, "dropped collection");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SortOrder;

    async fn connected() -> MemoryStore {
        let store = MemoryStore::new();
        store.connect().await.unwrap();
        store
    }

    fn user(name: &str, role: &str) -> Fields {
        Fields::new().with("name", name).with("role", role)
    }

    fn names(docs: &[RawDocument]) -> Vec<&str> {
        docs.iter()
            .filter_map(|d| d.fields.get("name").and_then(Value::as_text))
            .collect()
    }

    async fn seed(store: &MemoryStore) -> Vec<RawDocument> {
        store
            .insert_many(
                "users",
                vec![
                    user("Joe", "admin"),
                    user("Bob", "user"),
                    user("Jane", "user"),
                    user("Martin", "admin"),
                    user("Jack", "admin"),
                ],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn requires_connection() {
        let store = MemoryStore::new();
        assert!(!store.is_connected());

        let err = store.insert_one("users", user("Joe", "admin")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));

        store.connect().await.unwrap();
        store.insert_one("users", user("Joe", "admin")).await.unwrap();

        store.disconnect().await.unwrap();
        assert!(store.count_documents("users", &Filter::All).await.is_err());

        // data survives a reconnect
        store.connect().await.unwrap();
        assert_eq!(store.count_documents("users", &Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn open_connected_from_config() {
        let store = MemoryStore::open(StoreConfig::new().connect_on_create(true));
        assert!(store.is_connected());

        let store = MemoryStore::from_uri("memory://test").unwrap();
        assert_eq!(store.config().database, "test");
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = connected().await;
        let inserted = seed(&store).await;

        let all = store
            .find("users", &Filter::All, &FindOptions::new())
            .await
            .unwrap();
        assert_eq!(names(&all), vec!["Joe", "Bob", "Jane", "Martin", "Jack"]);
        assert_eq!(all[0].id, inserted[0].id);
        assert!(all.iter().all(|d| d.version == 0));

        let admins = store
            .find(
                "users",
                &Filter::eq("role", "admin"),
                &FindOptions::new().sort("name", SortOrder::Descending),
            )
            .await
            .unwrap();
        assert_eq!(names(&admins), vec!["Martin", "Joe", "Jack"]);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = connected().await;
        let found = store
            .find("ghosts", &Filter::All, &FindOptions::new())
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(store.estimated_count("ghosts").await.unwrap(), 0);
        assert!(store.find_one("ghosts", &Filter::All).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_one_and_by_id() {
        let store = connected().await;
        seed(&store).await;

        let bob = store
            .find_one("users", &Filter::eq("name", "Bob"))
            .await
            .unwrap()
            .unwrap();
        let by_id = store.find_by_id("users", bob.id).await.unwrap().unwrap();
        assert_eq!(by_id, bob);

        let via_filter = store.find_one("users", &Filter::id(bob.id)).await.unwrap();
        assert_eq!(via_filter, Some(bob));

        assert!(store
            .find_by_id("users", DocumentId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_returns_new_version() {
        let store = connected().await;
        seed(&store).await;

        let jane = store
            .find_one("users", &Filter::eq("name", "Jane"))
            .await
            .unwrap()
            .unwrap();

        let updated = store
            .find_by_id_and_update("users", jane.id, Fields::new().with("name", "Sara"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, jane.id);
        assert_eq!(updated.version, 1);
        assert_eq!(updated.fields.get("name"), Some(&Value::from("Sara")));
        assert_eq!(updated.fields.get("role"), Some(&Value::from("user")));

        let missing = store
            .find_by_id_and_update("users", DocumentId::new(), Fields::new())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_by_id_and_many() {
        let store = connected().await;
        seed(&store).await;

        let martin = store
            .find_one("users", &Filter::eq("name", "Martin"))
            .await
            .unwrap()
            .unwrap();
        let removed = store
            .find_by_id_and_delete("users", martin.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed, martin);
        assert_eq!(store.count_documents("users", &Filter::All).await.unwrap(), 4);
        assert!(store
            .find_by_id_and_delete("users", martin.id)
            .await
            .unwrap()
            .is_none());

        let admins = store
            .delete_many("users", &Filter::eq("role", "admin"))
            .await
            .unwrap();
        assert_eq!(admins, 2);
        assert_eq!(store.delete_many("users", &Filter::All).await.unwrap(), 2);
        assert_eq!(store.estimated_count("users").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counts() {
        let store = connected().await;
        seed(&store).await;

        assert_eq!(store.count_documents("users", &Filter::All).await.unwrap(), 5);
        assert_eq!(
            store
                .count_documents("users", &Filter::eq("role", "user"))
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.estimated_count("users").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn unique_index_rejects_insert() {
        let store = connected().await;
        store
            .ensure_collection("users", &[IndexSpec::unique("name")])
            .await
            .unwrap();
        store.insert_one("users", user("Joe", "admin")).await.unwrap();

        let err = store
            .insert_one("users", user("Joe", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref field, .. } if field == "name"));
        assert_eq!(store.estimated_count("users").await.unwrap(), 1);
        assert_eq!(store.stats().duplicate_rejections, 1);
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let store = connected().await;
        store
            .ensure_collection("users", &[IndexSpec::unique("name")])
            .await
            .unwrap();
        store.insert_one("users", user("Joe", "admin")).await.unwrap();

        // collides with a stored document
        let err = store
            .insert_many("users", vec![user("Ann", "user"), user("Joe", "user")])
            .await;
        assert!(err.is_err());

        // collides within the batch
        let err = store
            .insert_many("users", vec![user("Kim", "user"), user("Kim", "admin")])
            .await;
        assert!(err.is_err());

        assert_eq!(store.estimated_count("users").await.unwrap(), 1);
        assert!(store
            .find_one("users", &Filter::eq("name", "Ann"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn batch_size_limit() {
        let store = MemoryStore::open(
            StoreConfig::new()
                .max_batch_size(2)
                .connect_on_create(true),
        );
        let err = store
            .insert_many(
                "users",
                vec![user("A", "x"), user("B", "x"), user("C", "x")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BatchTooLarge { size: 3, max: 2 }));
    }

    #[tokio::test]
    async fn unique_index_rejects_update_and_frees_old_key() {
        let store = connected().await;
        store
            .ensure_collection("users", &[IndexSpec::unique("name")])
            .await
            .unwrap();
        let joe = store.insert_one("users", user("Joe", "admin")).await.unwrap();
        let bob = store.insert_one("users", user("Bob", "user")).await.unwrap();

        let err = store
            .find_by_id_and_update("users", bob.id, Fields::new().with("name", "Joe"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));

        // the rejected update left Bob untouched
        let still_bob = store.find_by_id("users", bob.id).await.unwrap().unwrap();
        assert_eq!(still_bob.version, 0);
        assert_eq!(still_bob.fields.get("name"), Some(&Value::from("Bob")));

        // renaming Joe releases "Joe" for Bob
        store
            .find_by_id_and_update("users", joe.id, Fields::new().with("name", "Joseph"))
            .await
            .unwrap();
        store
            .find_by_id_and_update("users", bob.id, Fields::new().with("name", "Joe"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn index_built_over_existing_documents() {
        let store = connected().await;
        store.insert_one("users", user("Joe", "admin")).await.unwrap();
        store.insert_one("users", user("Joe", "user")).await.unwrap();

        let err = store
            .ensure_collection("users", &[IndexSpec::unique("name")])
            .await;
        assert!(err.is_err());

        store
            .ensure_collection("users", &[IndexSpec::unique("role")])
            .await
            .unwrap();
        // idempotent
        store
            .ensure_collection("users", &[IndexSpec::unique("role")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn drop_collection() {
        let store = connected().await;
        seed(&store).await;

        assert_eq!(store.collection_names(), vec!["users".to_string()]);
        assert!(store.drop_collection("users").await.unwrap());
        assert!(!store.drop_collection("users").await.unwrap());
        assert!(store.collection_names().is_empty());
    }

    #[tokio::test]
    async fn drop_collection_keeps_unique_indexes() {
        let store = connected().await;
        store
            .ensure_collection("users", &[IndexSpec::unique("name")])
            .await
            .unwrap();
        seed(&store).await;

        assert!(store.drop_collection("users").await.unwrap());
        assert_eq!(store.estimated_count("users").await.unwrap(), 0);
        assert_eq!(store.collection_names(), vec!["users".to_string()]);

        store.insert_one("users", user("Joe", "admin")).await.unwrap();
        let err = store
            .insert_one("users", user("Joe", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref field, .. } if field == "name"));
        assert_eq!(store.estimated_count("users").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn returned_documents_do_not_alias_storage() {
        let store = connected().await;
        let mut joe = store.insert_one("users", user("Joe", "admin")).await.unwrap();
        joe.fields.insert("name", "Mallory");

        let stored = store.find_by_id("users", joe.id).await.unwrap().unwrap();
        assert_eq!(stored.fields.get("name"), Some(&Value::from("Joe")));
    }

    #[tokio::test]
    async fn stats_track_scans_and_lookups() {
        let store = connected().await;
        let docs = seed(&store).await;

        store
            .find("users", &Filter::eq("role", "admin"), &FindOptions::new())
            .await
            .unwrap();
        store.find_by_id("users", docs[0].id).await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.writes, 5);
        assert_eq!(stats.scans, 1);
        assert_eq!(stats.index_lookups, 1);
        assert!(stats.bytes_written > 0);
    }
}
