//! Test fixtures and store helpers.
//!
//! Provides a connected in-memory store, the user entity used throughout
//! the scenario tests, and helpers to bind and seed a user model.

use modelkit_core::{Document, FieldSpec, Model, Schema};
use modelkit_store::{DocumentStore, MemoryStore, StoreConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A store for one test.
pub struct TestStore {
    /// The store instance.
    pub store: Arc<MemoryStore>,
}

impl TestStore {
    /// Creates a connected in-memory store.
    pub fn connected() -> Self {
        Self::with_config(StoreConfig::new())
    }

    /// Creates an in-memory store that has not been connected.
    pub fn disconnected() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Creates a connected store from custom configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::open(config.connect_on_create(true))),
        }
    }

    /// The store as a trait object, as models take it.
    pub fn shared(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }
}

impl std::ops::Deref for TestStore {
    type Target = MemoryStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// The user entity of the scenario suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, unique.
    pub name: String,
    /// Role, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    /// A user with a role.
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: Some(role.to_string()),
        }
    }

    /// A user without a role.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: None,
        }
    }
}

/// Schema of [`User`]: unique required name, optional role.
pub fn user_schema() -> Schema {
    Schema::new()
        .field("name", FieldSpec::text().required().unique())
        .field("role", FieldSpec::text())
}

/// Joe(admin), Bob(user), Jane(user), Martin(admin), Jack(admin).
pub fn sample_users() -> Vec<User> {
    vec![
        User::new("Joe", "admin"),
        User::new("Bob", "user"),
        User::new("Jane", "user"),
        User::new("Martin", "admin"),
        User::new("Jack", "admin"),
    ]
}

/// Binds a user model to `store`.
///
/// # Panics
///
/// Panics if the store is not connected.
pub async fn user_model(store: &TestStore) -> Model<User> {
    Model::new(store.shared(), "User", user_schema())
        .await
        .expect("Failed to bind user model")
}

/// A connected store with a user model holding [`sample_users`].
pub async fn seeded_users() -> (TestStore, Model<User>) {
    let store = TestStore::connected();
    let users = user_model(&store).await;
    users
        .insert_many(&sample_users())
        .await
        .expect("Failed to seed users");
    (store, users)
}

/// Names of `docs`, in order.
pub fn names(docs: &[Document<User>]) -> Vec<&str> {
    docs.iter().map(|d| d.name.as_str()).collect()
}
