//! Stored document representation.

use crate::fields::Fields;
use crate::id::DocumentId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Name under which the document identifier is addressable in filters and
/// sorts. Schemas may not declare a field with this name.
pub const ID_FIELD: &str = "id";

/// A document as the store hands it out: identifier, version, and fields.
///
/// The version starts at 0 on insert and is bumped by the store on every
/// update. Callers never set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Store-managed version counter.
    pub version: u64,
    /// Field values.
    pub fields: Fields,
}

impl RawDocument {
    /// Creates a freshly inserted document.
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self {
            id,
            version: 0,
            fields,
        }
    }

    /// Resolves a field by name, including the virtual [`ID_FIELD`].
    ///
    /// Returns `None` for fields that are missing from the document.
    pub fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        if name == ID_FIELD {
            return Some(Cow::Owned(Value::Text(self.id.to_string())));
        }
        self.fields.get(name).map(Cow::Borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_virtual_id() {
        let id = DocumentId::new();
        let doc = RawDocument::new(id, Fields::new().with("name", "Joe"));

        assert_eq!(
            doc.field(ID_FIELD).as_deref(),
            Some(&Value::Text(id.to_string()))
        );
        assert_eq!(doc.field("name").as_deref(), Some(&Value::from("Joe")));
        assert!(doc.field("missing").is_none());
        assert_eq!(doc.version, 0);
    }
}
