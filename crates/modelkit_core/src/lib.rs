//! # ModelKit Core
//!
//! Typed collection accessors for ModelKit.
//!
//! This crate provides:
//! - [`Schema`] describing the fields, types and constraints of an entity kind
//! - [`Model`], a handle exposing CRUD operations over one collection
//! - [`QueryOptions`] for sorting and pagination
//! - [`Document`], a persisted entity with its identifier and version
//!
//! Storage is delegated to any [`DocumentStore`]. Uniqueness is enforced
//! by the store; the model validates payloads, filters and sort fields
//! against the schema before anything reaches it.
//!
//! ## Operations
//!
//! | Operation | Result |
//! |---|---|
//! | [`Model::create`] | persisted document |
//! | [`Model::insert_many`] | persisted documents, input order |
//! | [`Model::read_all`] | all documents, insertion order |
//! | [`Model::read`] | all documents, sorted and paginated |
//! | [`Model::read_all_by`] | matching documents, sorted and paginated |
//! | [`Model::read_one`] | first match or `None` |
//! | [`Model::read_by_id`] | document or `None` |
//! | [`Model::update`] | document after the patch |
//! | [`Model::delete_one`] | document before removal |
//! | [`Model::delete_all`] | number removed |
//! | [`Model::get_total_count`] | exact count |

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod model;
mod naming;
mod query;
mod schema;

pub use document::Document;
pub use error::{ModelError, ModelResult, SchemaViolation};
pub use model::{Model, ModelOptions};
pub use naming::collection_name;
pub use query::{ParseSortDirError, QueryOptions, SortDir};
pub use schema::{FieldSpec, FieldType, Schema};

// Re-exported so callers can build filters and ids without naming the
// lower crates.
pub use modelkit_codec::{DocumentId, Fields, Value};
pub use modelkit_store::{DocumentStore, Filter};
