//! User scenario tests for the collection accessor.

use modelkit_core::{DocumentStore, Fields, Filter, ModelError, QueryOptions, SortDir};
use modelkit_testkit::prelude::*;

#[tokio::test]
async fn create_and_read_one() {
    init_tracing();
    let store = TestStore::connected();
    let users = user_model(&store).await;

    let created = users.create(&User::named("Joe")).await.unwrap();
    assert_eq!(created.name, "Joe");
    assert_eq!(created.role, None);

    let found = users
        .read_one(&Filter::eq("name", "Joe"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.data, User::named("Joe"));
}

#[tokio::test]
async fn read_one_absent_is_none() {
    let (_store, users) = seeded_users().await;
    let found = users.read_one(&Filter::eq("name", "Nobody")).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn insert_many_and_read_all() {
    let store = TestStore::connected();
    let users = user_model(&store).await;

    let inserted = users
        .insert_many(&[User::named("Joe"), User::named("Bob")])
        .await
        .unwrap();
    assert_eq!(names(&inserted), vec!["Joe", "Bob"]);

    let all = users.read_all().await.unwrap();
    assert_eq!(names(&all), vec!["Joe", "Bob"]);
    assert_eq!(all[0].id, inserted[0].id);
}

#[tokio::test]
async fn total_count() {
    let (_store, users) = seeded_users().await;
    assert_eq!(users.get_total_count(None).await.unwrap(), 5);
    assert_eq!(
        users
            .get_total_count(Some(&Filter::eq("role", "admin")))
            .await
            .unwrap(),
        3
    );
}

mod read_all_by {
    use super::*;

    fn admins() -> Filter {
        Filter::eq("role", "admin")
    }

    #[tokio::test]
    async fn insertion_order() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read_all_by(&admins(), &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Joe", "Martin", "Jack"]);
    }

    #[tokio::test]
    async fn sorted_by_name() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read_all_by(&admins(), &QueryOptions::new().sort_by("name"))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Jack", "Joe", "Martin"]);
    }

    #[tokio::test]
    async fn sorted_descending() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read_all_by(
                &admins(),
                &QueryOptions::new().sort_by("name").sort_dir(SortDir::Desc),
            )
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Martin", "Joe", "Jack"]);
    }

    #[tokio::test]
    async fn limit_two() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read_all_by(&admins(), &QueryOptions::new().sort_by("name").limit(2))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Jack", "Joe"]);
    }

    #[tokio::test]
    async fn offset_two_limit_one() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read_all_by(
                &admins(),
                &QueryOptions::new().sort_by("name").limit(1).offset(2),
            )
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Martin"]);
    }

    #[tokio::test]
    async fn from_field_map() {
        let (_store, users) = seeded_users().await;
        let filter = Filter::from_fields(Fields::new().with("role", "user").with("name", "Bob"));
        let found = users
            .read_all_by(&filter, &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Bob"]);
    }

    #[tokio::test]
    async fn unknown_filter_field_is_rejected() {
        let (_store, users) = seeded_users().await;
        let err = users
            .read_all_by(&Filter::eq("email", "x"), &QueryOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation { ref message, .. } if message == "unknown field \"email\""));
    }

    #[tokio::test]
    async fn combined_predicates() {
        let (_store, users) = seeded_users().await;
        let filter = Filter::eq("role", "admin").and(Filter::gt("name", "Jb"));
        let found = users
            .read_all_by(&filter, &QueryOptions::new().sort_by("name"))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Joe", "Martin"]);

        let filter = Filter::is_in("name", ["Bob", "Jack"]).or(Filter::eq("name", "Jane"));
        let found = users
            .read_all_by(&filter, &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Bob", "Jane", "Jack"]);
    }
}

#[tokio::test]
async fn read_by_id() {
    let (_store, users) = seeded_users().await;
    let bob = users
        .read_one(&Filter::eq("name", "Bob"))
        .await
        .unwrap()
        .unwrap();

    let by_id = users.read_by_id(bob.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Bob");

    let by_filter = users.read_one(&Filter::id(bob.id)).await.unwrap().unwrap();
    assert_eq!(by_filter.id, bob.id);
}

#[tokio::test]
async fn update_keeps_id() {
    let (_store, users) = seeded_users().await;
    let jane = users
        .read_one(&Filter::eq("name", "Jane"))
        .await
        .unwrap()
        .unwrap();

    let updated = users
        .update(jane.id, &serde_json::json!({ "name": "Sara" }))
        .await
        .unwrap();

    assert_eq!(updated.id, jane.id);
    assert_eq!(updated.name, "Sara");
    assert_eq!(updated.role.as_deref(), Some("user"));
    assert_eq!(updated.version, jane.version + 1);
    assert!(users
        .read_one(&Filter::eq("name", "Jane"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn update_to_taken_name_is_constraint_violation() {
    let (_store, users) = seeded_users().await;
    let jane = users
        .read_one(&Filter::eq("name", "Jane"))
        .await
        .unwrap()
        .unwrap();

    let err = users
        .update(jane.id, &serde_json::json!({ "name": "Joe" }))
        .await
        .unwrap_err();
    match err {
        ModelError::ConstraintViolation { model, field, .. } => {
            assert_eq!(model, "User");
            assert_eq!(field, "name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn delete_one() {
    let (_store, users) = seeded_users().await;
    let martin = users
        .read_one(&Filter::eq("name", "Martin"))
        .await
        .unwrap()
        .unwrap();

    let removed = users.delete_one(martin.id).await.unwrap();
    assert_eq!(removed.name, "Martin");
    assert_eq!(users.get_total_count(None).await.unwrap(), 4);

    let err = users.delete_one(martin.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_all() {
    let (_store, users) = seeded_users().await;
    assert_eq!(users.get_total_count(None).await.unwrap(), 5);

    assert_eq!(users.delete_all().await.unwrap(), 5);
    assert_eq!(users.get_total_count(None).await.unwrap(), 0);
}

mod read {
    use super::*;

    #[tokio::test]
    async fn default_params() {
        let (_store, users) = seeded_users().await;
        let found = users.read(&QueryOptions::default()).await.unwrap();
        assert_eq!(names(&found), vec!["Joe", "Bob", "Jane", "Martin", "Jack"]);
    }

    #[tokio::test]
    async fn sorted_by_name() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read(&QueryOptions::new().sort_by("name"))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Bob", "Jack", "Jane", "Joe", "Martin"]);
    }

    #[tokio::test]
    async fn sorted_descending() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read(&QueryOptions::new().sort_by("name").desc())
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Martin", "Joe", "Jane", "Jack", "Bob"]);
    }

    #[tokio::test]
    async fn limit_two() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read(&QueryOptions::new().sort_by("name").limit(2))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Bob", "Jack"]);
    }

    #[tokio::test]
    async fn offset_past_limit_returns_tail() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read(&QueryOptions::new().sort_by("name").limit(5).offset(3))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Joe", "Martin"]);
    }

    #[tokio::test]
    async fn offset_without_limit_is_ignored() {
        let (_store, users) = seeded_users().await;
        let found = users
            .read(&QueryOptions::new().sort_by("name").offset(3))
            .await
            .unwrap();
        assert_eq!(found.len(), 5);
    }

    #[tokio::test]
    async fn options_from_json() {
        let (_store, users) = seeded_users().await;
        let options: QueryOptions =
            serde_json::from_str(r#"{ "sortBy": "name", "sortDir": "desc", "limit": 2 }"#)
                .unwrap();
        let found = users.read(&options).await.unwrap();
        assert_eq!(names(&found), vec!["Martin", "Joe"]);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let (_store, users) = seeded_users().await;
        let err = users.create(&User::new("Joe", "user")).await.unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(users.get_total_count(None).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn batch_with_duplicate_writes_nothing() {
        let store = TestStore::connected();
        let users = user_model(&store).await;

        let err = users
            .insert_many(&[User::named("Ann"), User::named("Ann")])
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(users.get_total_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_required_field() {
        let store = TestStore::connected();
        let users = user_model(&store).await;

        let err = users
            .create(&serde_json::json!({ "role": "admin" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed for User: field \"name\" is required"
        );
    }

    #[tokio::test]
    async fn unknown_payload_field() {
        let store = TestStore::connected();
        let users = user_model(&store).await;

        let err = users
            .create(&serde_json::json!({ "name": "Joe", "age": 3 }))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn disconnected_store_is_connection_error() {
        let store = TestStore::connected();
        let users = user_model(&store).await;
        store.disconnect().await.unwrap();

        let err = users.read_all().await.unwrap_err();
        assert!(err.is_connection());

        let err = users.create(&User::named("Joe")).await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Connection(modelkit_store::StoreError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn binding_disconnected_store_fails() {
        let store = TestStore::disconnected();
        let err = modelkit_core::Model::<User>::new(store.shared(), "User", user_schema())
            .await
            .unwrap_err();
        assert!(err.is_connection());
    }
}

#[tokio::test]
async fn models_share_a_store() {
    let store = TestStore::connected();
    let users = user_model(&store).await;
    let again = user_model(&store).await;

    users.create(&User::named("Joe")).await.unwrap();
    assert_eq!(again.get_total_count(None).await.unwrap(), 1);
    assert_eq!(store.collection_names(), vec!["users".to_string()]);
}

#[tokio::test]
async fn concurrent_creates() {
    let store = TestStore::connected();
    let users = user_model(&store).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let users = users.clone();
        handles.push(tokio::spawn(async move {
            users.create(&User::named(&format!("user{i}"))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(users.get_total_count(None).await.unwrap(), 16);
}
