//! Typed collection accessor.

use crate::document::Document;
use crate::error::{ModelError, ModelResult, SchemaViolation};
use crate::naming::collection_name;
use crate::query::QueryOptions;
use crate::schema::Schema;
use modelkit_codec::{CodecError, DocumentId, Fields, RawDocument};
use modelkit_store::{DocumentStore, Filter, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// Options for binding a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// Collection name. Defaults to the lower-cased, pluralised model name.
    pub collection: Option<String>,
}

impl ModelOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds to an explicit collection name.
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }
}

/// A typed accessor over one collection.
///
/// `Model<T>` validates payloads, filters and sort fields against its
/// [`Schema`] and forwards every operation to the backing
/// [`DocumentStore`]. It holds no mutable state; clones share the store and
/// schema and can be used concurrently.
///
/// # Reads
///
/// [`read`](Self::read) and [`read_all_by`](Self::read_all_by) sort over
/// the whole matching set before paginating, so `limit`/`offset` always
/// page through the sorted sequence. Without `sort_by` documents come back
/// in insertion order.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use modelkit_core::{FieldSpec, Filter, Model, QueryOptions, Schema};
/// use modelkit_store::{MemoryStore, StoreConfig};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     name: String,
///     role: String,
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(MemoryStore::open(StoreConfig::new().connect_on_create(true)));
/// let schema = Schema::new()
///     .field("name", FieldSpec::text().required().unique())
///     .field("role", FieldSpec::text().default_value("user"));
///
/// let users: Model<User> = Model::new(store, "User", schema).await.unwrap();
/// assert_eq!(users.collection(), "users");
///
/// users.create(&User { name: "Joe".into(), role: "admin".into() }).await.unwrap();
/// users.create(&serde_json::json!({ "name": "Bob" })).await.unwrap();
///
/// let admins = users
///     .read_all_by(&Filter::eq("role", "admin"), &QueryOptions::new().sort_by("name"))
///     .await
///     .unwrap();
/// assert_eq!(admins[0].name, "Joe");
/// assert_eq!(users.get_total_count(None).await.unwrap(), 2);
/// # });
/// ```
pub struct Model<T> {
    /// Backing store.
    store: Arc<dyn DocumentStore>,
    /// Entity kind name, used in errors and logs.
    name: Arc<str>,
    /// Backing collection name.
    collection: Arc<str>,
    /// Entity schema.
    schema: Arc<Schema>,
    /// Type marker.
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: Arc::clone(&self.name),
            collection: Arc::clone(&self.collection),
            schema: Arc::clone(&self.schema),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("collection", &self.collection)
            .field("fields", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl<T> Model<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Binds a model to the collection derived from `name`.
    ///
    /// Registers the collection and its unique indexes with the store.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidSchema`] if the schema or name is malformed
    /// - [`ModelError::ConstraintViolation`] if existing documents already
    ///   collide on a unique field
    /// - [`ModelError::Connection`] if the store is not connected
    pub async fn new(
        store: Arc<dyn DocumentStore>,
        name: impl Into<String>,
        schema: Schema,
    ) -> ModelResult<Self> {
        Self::with_options(store, name, schema, ModelOptions::default()).await
    }

    /// Binds a model with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`Model::new`].
    pub async fn with_options(
        store: Arc<dyn DocumentStore>,
        name: impl Into<String>,
        schema: Schema,
        options: ModelOptions,
    ) -> ModelResult<Self> {
        let name: String = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::invalid_schema("model name must not be empty"));
        }
        schema
            .check()
            .map_err(|v| ModelError::invalid_schema(v.message))?;

        let collection = options
            .collection
            .unwrap_or_else(|| collection_name(&name));
        if collection.is_empty() {
            return Err(ModelError::invalid_schema(
                "collection name must not be empty",
            ));
        }

        let indexes = schema.unique_indexes();
        store
            .ensure_collection(&collection, &indexes)
            .await
            .map_err(|e| ModelError::from_store(name.as_str(), e))?;

        info!(model = %name, %collection, unique = indexes.len(), "model bound");
        Ok(Self {
            store,
            name: name.into(),
            collection: collection.into(),
            schema: Arc::new(schema),
            _marker: PhantomData,
        })
    }

    /// Entity kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Entity schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Backing store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Persists one entity.
    ///
    /// `payload` is anything that serializes to an object: a `T`, a partial
    /// struct, a `serde_json::Value`, or [`Fields`]. Defaults are filled in
    /// before the write.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Validation`] if the payload breaks the schema or would
    ///   not decode into `T`
    /// - [`ModelError::ConstraintViolation`] on a unique collision
    pub async fn create<P>(&self, payload: &P) -> ModelResult<Document<T>>
    where
        P: Serialize + ?Sized,
    {
        let fields = self.prepare_create(payload)?;
        let raw = self
            .store
            .insert_one(&self.collection, fields)
            .await
            .map_err(|e| self.lift(e))?;

        debug!(model = %self.name, id = %raw.id, "created");
        Document::from_raw(&raw)
    }

    /// Persists a batch of entities, returning them in input order.
    ///
    /// Every payload is validated before the store is called. Whether a
    /// rejected batch leaves earlier documents behind is up to the store;
    /// [`modelkit_store::MemoryStore`] writes all or nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Model::create`].
    pub async fn insert_many<P>(&self, payloads: &[P]) -> ModelResult<Vec<Document<T>>>
    where
        P: Serialize,
    {
        let batch = payloads
            .iter()
            .map(|p| self.prepare_create(p))
            .collect::<ModelResult<Vec<_>>>()?;

        let raws = self
            .store
            .insert_many(&self.collection, batch)
            .await
            .map_err(|e| self.lift(e))?;

        debug!(model = %self.name, inserted = raws.len(), "inserted batch");
        decode_all(&raws)
    }

    /// Every document in insertion order.
    pub async fn read_all(&self) -> ModelResult<Vec<Document<T>>> {
        self.read(&QueryOptions::new()).await
    }

    /// Every document, sorted and paginated per `options`.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] if `sort_by` names an unknown field.
    pub async fn read(&self, options: &QueryOptions) -> ModelResult<Vec<Document<T>>> {
        self.read_all_by(&Filter::All, options).await
    }

    /// Matching documents, sorted and paginated per `options`.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] if the filter or `sort_by` references an
    /// unknown field, or a filter operand has the wrong type.
    pub async fn read_all_by(
        &self,
        filter: &Filter,
        options: &QueryOptions,
    ) -> ModelResult<Vec<Document<T>>> {
        self.check_filter(filter)?;
        if let Some(field) = &options.sort_by {
            self.schema
                .check_sort_field(field)
                .map_err(|v| self.invalid(v))?;
        }

        let raws = self
            .store
            .find(&self.collection, filter, &options.to_find_options())
            .await
            .map_err(|e| self.lift(e))?;

        debug!(
            model = %self.name,
            sort_by = options.sort_by.as_deref().unwrap_or("-"),
            limit = options.limit,
            offset = options.offset,
            returned = raws.len(),
            "read"
        );
        decode_all(&raws)
    }

    /// First matching document in insertion order.
    ///
    /// Absence is not an error.
    pub async fn read_one(&self, filter: &Filter) -> ModelResult<Option<Document<T>>> {
        self.check_filter(filter)?;
        let raw = self
            .store
            .find_one(&self.collection, filter)
            .await
            .map_err(|e| self.lift(e))?;
        raw.as_ref().map(Document::from_raw).transpose()
    }

    /// Document with the given identifier.
    pub async fn read_by_id(&self, id: DocumentId) -> ModelResult<Option<Document<T>>> {
        let raw = self
            .store
            .find_by_id(&self.collection, id)
            .await
            .map_err(|e| self.lift(e))?;
        raw.as_ref().map(Document::from_raw).transpose()
    }

    /// Applies a partial update and returns the updated document.
    ///
    /// Only fields present in `patch` change. The identifier never does.
    ///
    /// # Errors
    ///
    /// - [`ModelError::NotFound`] if no document has `id`
    /// - [`ModelError::Validation`] if the patch breaks the schema or the
    ///   patched document would not decode into `T`
    /// - [`ModelError::ConstraintViolation`] on a unique collision
    pub async fn update<P>(&self, id: DocumentId, patch: &P) -> ModelResult<Document<T>>
    where
        P: Serialize + ?Sized,
    {
        let patch = self.to_fields(patch)?;
        let patch = self
            .schema
            .prepare_patch(patch)
            .map_err(|v| self.invalid(v))?;

        let current = self
            .store
            .find_by_id(&self.collection, id)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| ModelError::not_found(self.name(), id))?;
        let mut merged = current.fields;
        merged.merge(patch.clone());
        self.check_typed(&merged)?;

        let updated = self
            .store
            .find_by_id_and_update(&self.collection, id, patch)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| ModelError::not_found(self.name(), id))?;

        debug!(model = %self.name, %id, version = updated.version, "updated");
        Document::from_raw(&updated)
    }

    /// Deletes a document and returns it as it was.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if no document has `id`.
    pub async fn delete_one(&self, id: DocumentId) -> ModelResult<Document<T>> {
        let removed = self
            .store
            .find_by_id_and_delete(&self.collection, id)
            .await
            .map_err(|e| self.lift(e))?
            .ok_or_else(|| ModelError::not_found(self.name(), id))?;

        debug!(model = %self.name, %id, "deleted");
        Document::from_raw(&removed)
    }

    /// Deletes every document, returning how many were removed.
    pub async fn delete_all(&self) -> ModelResult<u64> {
        let removed = self
            .store
            .delete_many(&self.collection, &Filter::All)
            .await
            .map_err(|e| self.lift(e))?;

        debug!(model = %self.name, removed, "deleted all");
        Ok(removed)
    }

    /// Exact number of matching documents, or of all documents.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] if the filter references an unknown field.
    pub async fn get_total_count(&self, filter: Option<&Filter>) -> ModelResult<u64> {
        let all = Filter::All;
        let filter = filter.unwrap_or(&all);
        self.check_filter(filter)?;
        self.store
            .count_documents(&self.collection, filter)
            .await
            .map_err(|e| self.lift(e))
    }

    fn to_fields<P: Serialize + ?Sized>(&self, payload: &P) -> ModelResult<Fields> {
        Fields::from_serialize(payload).map_err(|e| match e {
            CodecError::NotAnObject { kind } => {
                ModelError::validation(self.name(), format!("payload must be an object, got {kind}"))
            }
            other => ModelError::Codec(other),
        })
    }

    fn prepare_create<P: Serialize + ?Sized>(&self, payload: &P) -> ModelResult<Fields> {
        let fields = self.to_fields(payload)?;
        let fields = self
            .schema
            .prepare_create(fields)
            .map_err(|v| self.invalid(v))?;
        self.check_typed(&fields)?;
        Ok(fields)
    }

    /// Rejects fields that would not decode back into `T`.
    fn check_typed(&self, fields: &Fields) -> ModelResult<()> {
        fields.to_typed::<T>().map(drop).map_err(|e| {
            ModelError::validation(self.name(), format!("document does not fit the model type: {e}"))
        })
    }

    fn check_filter(&self, filter: &Filter) -> ModelResult<()> {
        self.schema.check_filter(filter).map_err(|v| self.invalid(v))
    }

    fn invalid(&self, violation: SchemaViolation) -> ModelError {
        ModelError::validation(self.name(), violation.message)
    }

    fn lift(&self, err: StoreError) -> ModelError {
        ModelError::from_store(self.name(), err)
    }
}

fn decode_all<T: DeserializeOwned>(raws: &[RawDocument]) -> ModelResult<Vec<Document<T>>> {
    raws.iter().map(Document::from_raw).collect()
}
