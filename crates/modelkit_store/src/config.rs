//! Store configuration.

use crate::error::{StoreError, StoreResult};

/// URI scheme served by [`crate::MemoryStore`].
pub const MEMORY_SCHEME: &str = "memory";

/// Configuration for opening a document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection URI, e.g. `memory://test`.
    pub uri: String,

    /// Database name, taken from the URI path.
    pub database: String,

    /// Maximum number of documents accepted by one `insert_many` call.
    pub max_batch_size: usize,

    /// Whether to connect as soon as the store is opened.
    pub connect_on_create: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: format!("{MEMORY_SCHEME}://default"),
            database: "default".to_string(),
            max_batch_size: 1000,
            connect_on_create: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a connection URI of the form `memory://<database>`.
    ///
    /// An empty database segment selects `default`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConnectionUri`] for any other scheme or
    /// for a database name containing `/`.
    pub fn from_uri(uri: &str) -> StoreResult<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| StoreError::invalid_uri(uri, "missing scheme"))?;

        if scheme != MEMORY_SCHEME {
            return Err(StoreError::invalid_uri(
                uri,
                format!("unsupported scheme {scheme:?}"),
            ));
        }

        let database = rest.trim_end_matches('/');
        if database.contains('/') {
            return Err(StoreError::invalid_uri(uri, "nested database path"));
        }
        let database = if database.is_empty() {
            "default"
        } else {
            database
        };

        Ok(Self {
            uri: uri.to_string(),
            database: database.to_string(),
            ..Self::default()
        })
    }

    /// Sets the maximum `insert_many` batch size.
    #[must_use]
    pub const fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Sets whether to connect when the store is opened.
    #[must_use]
    pub const fn connect_on_create(mut self, value: bool) -> Self {
        self.connect_on_create = value;
        self
    }
}
