//! Error types for the store crate.

use modelkit_codec::CodecError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a backing document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is not connected.
    #[error("store is not connected")]
    NotConnected,

    /// A write would violate a unique index.
    #[error("duplicate key in {collection}.{field}: {value}")]
    DuplicateKey {
        /// Collection the write targeted.
        collection: String,
        /// Indexed field.
        field: String,
        /// Rendered colliding value.
        value: String,
    },

    /// A batch insert exceeded the configured maximum.
    #[error("batch of {size} documents exceeds the maximum of {max}")]
    BatchTooLarge {
        /// Number of documents in the batch.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The connection URI could not be understood.
    #[error("invalid connection uri {uri:?}: {reason}")]
    InvalidConnectionUri {
        /// The URI that was given.
        uri: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Stored bytes could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl StoreError {
    /// Creates a duplicate key error.
    pub fn duplicate_key(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid connection URI error.
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConnectionUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error means the store could not be reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::duplicate_key("users", "email", "\"a@b.c\"");
        assert_eq!(
            err.to_string(),
            "duplicate key in users.email: \"a@b.c\""
        );

        assert_eq!(StoreError::NotConnected.to_string(), "store is not connected");
        assert!(StoreError::NotConnected.is_connection());
        assert!(!StoreError::BatchTooLarge { size: 2, max: 1 }.is_connection());
    }
}
