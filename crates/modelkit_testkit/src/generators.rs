//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use crate::fixtures::User;
use modelkit_codec::{DocumentId, Fields, Value, ID_FIELD};
use modelkit_core::{QueryOptions, SortDir};
use proptest::prelude::*;

/// Strategy for generating document identifiers.
pub fn document_id_strategy() -> impl Strategy<Value = DocumentId> {
    prop::array::uniform16(any::<u8>()).prop_map(DocumentId::from_bytes)
}

/// Strategy for generating field names. Never yields the reserved `id`.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}")
        .expect("Invalid regex")
        .prop_filter("id is reserved", |s| s != ID_FIELD)
}

/// Strategy for generating scalar field values.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9..1.0e9f64).prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::Text),
    ]
}

/// Strategy for generating field values, nested up to three levels.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_value_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

/// Strategy for generating field maps.
pub fn fields_strategy() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(field_name_strategy(), value_strategy(), 0..8)
        .prop_map(Fields::from)
}

/// Strategy for generating user names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,9}").expect("Invalid regex")
}

/// Strategy for generating roles.
pub fn role_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("admin".to_string()), Just("user".to_string())]
}

/// Strategy for generating up to `max` users with distinct names.
pub fn unique_users_strategy(max: usize) -> impl Strategy<Value = Vec<User>> {
    prop::collection::btree_set(name_strategy(), 0..=max).prop_flat_map(|names| {
        let count = names.len();
        prop::collection::vec(role_strategy(), count).prop_map(move |roles| {
            names
                .iter()
                .zip(roles)
                .map(|(name, role)| User {
                    name: name.clone(),
                    role: Some(role),
                })
                .collect()
        })
    })
}

/// Strategy for generating name-sorted pagination options.
pub fn paging_strategy() -> impl Strategy<Value = QueryOptions> {
    (
        prop_oneof![Just(SortDir::Asc), Just(SortDir::Desc)],
        0u64..8,
        0u64..8,
    )
        .prop_map(|(dir, limit, offset)| {
            QueryOptions::new()
                .sort_by("name")
                .sort_dir(dir)
                .limit(limit)
                .offset(offset)
        })
}
