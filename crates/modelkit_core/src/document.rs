//! Typed documents.

use crate::error::ModelResult;
use modelkit_codec::{DocumentId, RawDocument};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// A persisted entity: identifier, version and typed data.
///
/// Derefs to the data, so fields read naturally:
///
/// ```rust,ignore
/// let joe = users.create(&User::new("Joe", "admin")).await?;
/// assert_eq!(joe.name, "Joe");
/// println!("{} at version {}", joe.id, joe.version);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Store-managed version, bumped on every update.
    pub version: u64,
    /// Entity data.
    pub data: T,
}

impl<T: DeserializeOwned> Document<T> {
    /// Decodes a store document.
    pub fn from_raw(raw: &RawDocument) -> ModelResult<Self> {
        Ok(Self {
            id: raw.id,
            version: raw.version,
            data: raw.fields.to_typed()?,
        })
    }
}

impl<T> Document<T> {
    /// Returns the entity data, dropping the identifier.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> Deref for Document<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for Document<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}
