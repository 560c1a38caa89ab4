//! # ModelKit Store
//!
//! Backing store interface and implementations for ModelKit.
//!
//! A store is the document database a model handle talks to. It owns
//! identifiers, versions, unique indexes and batch semantics; it knows
//! nothing about schemas or typed payloads.
//!
//! ## Design Principles
//!
//! - Stores speak [`Fields`](modelkit_codec::Fields) and
//!   [`RawDocument`](modelkit_codec::RawDocument) only
//! - Queries are a closed [`Filter`] set plus [`FindOptions`]
//! - Must be `Send + Sync` so one store can back many handles
//! - Every operation on a disconnected store fails with
//!   [`StoreError::NotConnected`]
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - For testing and ephemeral data
//!
//! ## Example
//!
//! ```rust
//! use modelkit_codec::Fields;
//! use modelkit_store::{DocumentStore, Filter, FindOptions, MemoryStore, SortOrder};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = MemoryStore::from_uri("memory://app").unwrap();
//! store.connect().await.unwrap();
//!
//! store.insert_one("users", Fields::new().with("name", "Joe")).await.unwrap();
//! store.insert_one("users", Fields::new().with("name", "Bob")).await.unwrap();
//!
//! let sorted = store
//!     .find("users", &Filter::All, &FindOptions::new().sort("name", SortOrder::Ascending))
//!     .await
//!     .unwrap();
//! assert_eq!(sorted.len(), 2);
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod filter;
mod index;
mod memory;
mod options;
mod stats;
mod store;

pub use config::{StoreConfig, MEMORY_SCHEME};
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use index::{IndexKey, IndexSpec, UniqueIndex};
pub use memory::MemoryStore;
pub use options::{FindOptions, SortOrder};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::DocumentStore;
