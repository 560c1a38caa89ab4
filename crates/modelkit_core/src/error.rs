//! Error types for model operations.

use modelkit_codec::{CodecError, DocumentId};
use modelkit_store::StoreError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors returned by a [`crate::Model`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// A payload, filter, or sort field violates the schema.
    #[error("validation failed for {model}: {message}")]
    Validation {
        /// Model name.
        model: String,
        /// What was wrong.
        message: String,
    },

    /// A write collided on a unique field.
    #[error("{model}.{field} must be unique, {value} is already taken")]
    ConstraintViolation {
        /// Model name.
        model: String,
        /// Unique field.
        field: String,
        /// Rendered colliding value.
        value: String,
    },

    /// The target of an update or delete does not exist.
    #[error("{model} {id} not found")]
    NotFound {
        /// Model name.
        model: String,
        /// Identifier that was looked up.
        id: DocumentId,
    },

    /// The schema itself is malformed.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// What was wrong.
        message: String,
    },

    /// The backing store could not be reached.
    #[error("connection error: {0}")]
    Connection(StoreError),

    /// Any other backing store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// A document could not be converted to or from its typed form.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ModelError {
    /// Creates a validation error.
    pub fn validation(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(model: impl Into<String>, id: DocumentId) -> Self {
        Self::NotFound {
            model: model.into(),
            id,
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Classifies a store error on behalf of `model`.
    pub fn from_store(model: impl Into<String>, err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field, value, .. } => Self::ConstraintViolation {
                model: model.into(),
                field,
                value,
            },
            StoreError::NotConnected => Self::Connection(err),
            StoreError::Codec(e) => Self::Codec(e),
            other => Self::Store(other),
        }
    }

    /// Returns true for [`ModelError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for [`ModelError::ConstraintViolation`].
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// Returns true for [`ModelError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for [`ModelError::Connection`].
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<StoreError> for ModelError {
    /// Uses the collection name as the model name for unique collisions.
    fn from(err: StoreError) -> Self {
        let model = match &err {
            StoreError::DuplicateKey { collection, .. } => collection.clone(),
            _ => String::new(),
        };
        Self::from_store(model, err)
    }
}

/// A schema rule broken by a payload, filter, or sort field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SchemaViolation {
    /// What was wrong.
    pub message: String,
}

impl SchemaViolation {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
