//! # ModelKit Testkit
//!
//! Test utilities for ModelKit.
//!
//! This crate provides:
//! - Test fixtures: a connected in-memory store, the scenario user entity
//!   and its schema, seeded models
//! - Property-based test generators using proptest
//! - Tracing initialisation for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelkit_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn test_with_users() {
//!     init_tracing();
//!     let (_store, users) = seeded_users().await;
//!     assert_eq!(users.get_total_count(None).await.unwrap(), 5);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
