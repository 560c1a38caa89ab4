//! Field maps: the body of a document.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// An ordered mapping from field name to value.
///
/// `Fields` is both the stored body of a document and the shape every
/// payload, patch, and equality filter is converted into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Converts any serializable payload into a field map.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotAnObject`] if the payload does not
    /// serialize to an object.
    pub fn from_serialize<P: Serialize + ?Sized>(payload: &P) -> CodecResult<Self> {
        let json = serde_json::to_value(payload)?;
        match Value::deserialize(json)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CodecError::NotAnObject { kind: other.kind() }),
        }
    }

    /// Deserializes the field map into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serde`] if the fields do not fit `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> CodecResult<T> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes a field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Returns true if the field is present (even if null).
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Merges `patch` into this map. Fields absent from the patch are kept.
    pub fn merge(&mut self, patch: Fields) {
        self.0.extend(patch.0);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Field names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Consumes the map, returning the inner `BTreeMap`.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for Fields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        role: Option<String>,
    }

    #[test]
    fn from_struct_and_back() {
        let user = User {
            name: "Joe".into(),
            role: Some("admin".into()),
        };

        let fields = Fields::from_serialize(&user).unwrap();
        assert_eq!(fields.get("name"), Some(&Value::from("Joe")));
        assert_eq!(fields.get("role"), Some(&Value::from("admin")));

        let back: User = fields.to_typed().unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn none_becomes_null() {
        let user = User {
            name: "Bob".into(),
            role: None,
        };

        let fields = Fields::from_serialize(&user).unwrap();
        assert!(fields.contains("role"));
        assert_eq!(fields.get("role"), Some(&Value::Null));
    }

    #[test]
    fn non_object_payload_rejected() {
        let err = Fields::from_serialize(&42).unwrap_err();
        assert_eq!(err, CodecError::NotAnObject { kind: "integer" });
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut fields = Fields::new().with("name", "Jane").with("role", "user");
        fields.merge(Fields::new().with("name", "Sara"));

        assert_eq!(fields.get("name"), Some(&Value::from("Sara")));
        assert_eq!(fields.get("role"), Some(&Value::from("user")));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn collect_from_pairs() {
        let fields: Fields = vec![("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
