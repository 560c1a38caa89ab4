//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use modelkit_core::{FieldSpec, Model, Schema};
use modelkit_store::{MemoryStore, StoreConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Entity used by the model benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique name.
    pub name: String,
    /// Role.
    pub role: String,
    /// Age.
    pub age: i64,
}

/// Schema of [`Person`].
pub fn person_schema() -> Schema {
    Schema::new()
        .field("name", FieldSpec::text().required().unique())
        .field("role", FieldSpec::text().default_value("user"))
        .field("age", FieldSpec::integer())
}

/// Generate `count` people with distinct names.
pub fn generate_people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person {
            name: format!("person_{i:06}"),
            role: if i % 3 == 0 { "admin" } else { "user" }.to_string(),
            age: (i % 90) as i64,
        })
        .collect()
}

/// Single-threaded runtime for driving async operations.
pub fn runtime() -> Runtime {
    Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

/// A fresh connected store.
pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::open(
        StoreConfig::new()
            .max_batch_size(100_000)
            .connect_on_create(true),
    ))
}

/// A person model over a fresh store holding `count` people.
pub fn seeded(rt: &Runtime, count: usize) -> Model<Person> {
    rt.block_on(async {
        let model = Model::new(store(), "Person", person_schema())
            .await
            .expect("Failed to bind model");
        model
            .insert_many(&generate_people(count))
            .await
            .expect("Failed to seed");
        model
    })
}
