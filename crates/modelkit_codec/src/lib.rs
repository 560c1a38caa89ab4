//! # ModelKit Codec
//!
//! Document value model and canonical encoding for ModelKit.
//!
//! This crate provides:
//! - [`Value`], the dynamic field value every document is made of
//! - [`Fields`], the ordered field map forming a document body
//! - [`DocumentId`] and [`RawDocument`], the store-level document
//! - Canonical CBOR encoding of field maps ([`to_cbor`], [`from_cbor`])
//! - A serde bridge between typed payloads and field maps
//!
//! ## Usage
//!
//! ```
//! use modelkit_codec::{from_cbor, to_cbor, Fields, Value};
//!
//! let fields = Fields::new().with("name", "Joe").with("role", "admin");
//! let bytes = to_cbor(&fields).unwrap();
//!
//! let decoded = from_cbor(&bytes).unwrap();
//! assert_eq!(decoded.get("name"), Some(&Value::from("Joe")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod document;
mod error;
mod fields;
mod id;
mod value;

pub use cbor::{from_cbor, to_cbor};
pub use document::{RawDocument, ID_FIELD};
pub use error::{CodecError, CodecResult};
pub use fields::Fields;
pub use id::DocumentId;
pub use value::Value;
