//! Unique single-field index.

use crate::error::{StoreError, StoreResult};
use modelkit_codec::{DocumentId, Value};
use std::collections::HashMap;

/// Specification of a unique index over one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexSpec {
    /// Indexed field name.
    pub field: String,
}

impl IndexSpec {
    /// Creates a unique index specification for `field`.
    pub fn unique(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// Hashable key derived from a field value.
///
/// Two values get the same key exactly when filters consider them equal:
/// numbers are keyed by value, so `1`, `1.0` and `[1]`/`[1.0]` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Null nested inside an array or object.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer, or a float with an integral value in `i64` range.
    Integer(i64),
    /// Any other float, by bit pattern.
    Float(u64),
    /// Text.
    Text(String),
    /// Array of keys.
    Array(Vec<IndexKey>),
    /// Object as sorted key/value pairs.
    Object(Vec<(String, IndexKey)>),
}

impl IndexKey {
    /// Derives the key for a value. Null values are not indexed.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            other => Some(Self::normalize(other)),
        }
    }

    fn normalize(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Integer(n) => Self::Integer(*n),
            Value::Float(f) => {
                // 2^63
                const BOUND: f64 = 9_223_372_036_854_775_808.0;
                if f.fract() == 0.0 && (-BOUND..BOUND).contains(f) {
                    Self::Integer(*f as i64)
                } else {
                    Self::Float(f.to_bits())
                }
            }
            Value::Text(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::normalize).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::normalize(v)))
                    .collect(),
            ),
        }
    }
}

/// Hash-based unique index for one field of one collection.
///
/// Maps each key to the single document that owns it. Documents whose
/// field is missing or null are not indexed, so any number of them may
/// coexist.
///
/// # Example
///
/// ```rust,ignore
/// let mut index = UniqueIndex::new("users", IndexSpec::unique("email"));
///
/// index.insert(&Value::from("a@example.com"), id)?;
/// assert_eq!(index.lookup(&Value::from("a@example.com")), Some(id));
/// ```
#[derive(Debug)]
pub struct UniqueIndex {
    /// Owning collection, for error reporting.
    collection: String,
    /// Index specification.
    spec: IndexSpec,
    /// Key to owning document.
    entries: HashMap<IndexKey, DocumentId>,
}

impl UniqueIndex {
    /// Creates an empty unique index.
    pub fn new(collection: impl Into<String>, spec: IndexSpec) -> Self {
        Self {
            collection: collection.into(),
            spec,
            entries: HashMap::new(),
        }
    }

    /// Returns the index specification.
    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    /// Returns the indexed field name.
    pub fn field(&self) -> &str {
        &self.spec.field
    }

    /// Checks whether `id` may hold `value` without a collision.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if another document owns the key.
    pub fn check(&self, value: &Value, id: DocumentId) -> StoreResult<()> {
        let Some(key) = IndexKey::from_value(value) else {
            return Ok(());
        };
        match self.entries.get(&key) {
            Some(owner) if *owner != id => Err(self.duplicate(value)),
            _ => Ok(()),
        }
    }

    /// Records that `id` holds `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if another document owns the key.
    pub fn insert(&mut self, value: &Value, id: DocumentId) -> StoreResult<()> {
        self.check(value, id)?;
        if let Some(key) = IndexKey::from_value(value) {
            self.entries.insert(key, id);
        }
        Ok(())
    }

    /// Removes the entry for `value` if `id` owns it.
    pub fn remove(&mut self, value: &Value, id: DocumentId) -> bool {
        let Some(key) = IndexKey::from_value(value) else {
            return false;
        };
        if self.entries.get(&key) == Some(&id) {
            self.entries.remove(&key);
            true
        } else {
            false
        }
    }

    /// Looks up the document owning `value`.
    pub fn lookup(&self, value: &Value) -> Option<DocumentId> {
        IndexKey::from_value(value).and_then(|key| self.entries.get(&key).copied())
    }

    /// Rebuilds the index from `(value, id)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] on the first collision; the
    /// index is left empty in that case.
    pub fn rebuild<'a, I>(&mut self, entries: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (&'a Value, DocumentId)>,
    {
        self.clear();
        for (value, id) in entries {
            if let Err(e) = self.insert(value, id) {
                self.clear();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Builds the duplicate key error for `value`.
    pub fn duplicate(&self, value: &Value) -> StoreError {
        StoreError::duplicate_key(&self.collection, &self.spec.field, render(value))
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{s:?}"),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
