use schoolbook_core::{Collection, DocumentStore, StoreConfig, StoreError};
use serde_json::json;

#[tokio::test]
async fn store_opens_lazily_and_once() {
    let store = DocumentStore::in_memory();
    assert!(!store.is_open());

    let (first, second) = tokio::join!(store.open(), store.open());
    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(store.is_open());
    assert!(first.same_connection(&second));

    let third = store.open().await.unwrap();
    assert!(first.same_connection(&third));
}

#[tokio::test]
async fn first_operation_opens_the_store() {
    let store = DocumentStore::in_memory();
    assert_eq!(store.count(Collection::Students).await.unwrap(), 0);
    assert!(store.is_open());
}

#[tokio::test]
async fn save_then_find_by_id_returns_the_document() {
    let store = DocumentStore::in_memory();
    let document = json!({"id": "s-1", "name": "Ada", "email": "ada@example.com"});

    store.save(Collection::Students, &document).await.unwrap();

    let found = store.find_by_id(Collection::Students, "s-1").await.unwrap();
    assert_eq!(found, Some(document));
    assert_eq!(
        store.find_by_id(Collection::Students, "missing").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn save_rejects_an_existing_key() {
    let store = DocumentStore::in_memory();
    let document = json!({"id": "r-1", "name": "Lab 3", "type": "room"});
    store.save(Collection::Resources, &document).await.unwrap();

    let err = store.save(Collection::Resources, &document).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateKey { collection: Collection::Resources, ref key } if key == "r-1"
    ));
}

#[tokio::test]
async fn documents_without_string_id_are_rejected() {
    let store = DocumentStore::in_memory();
    let err = store
        .save(Collection::Courses, &json!({"id": 7, "title": "Algorithms"}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingKey { .. }));
}

#[tokio::test]
async fn update_upserts_and_keeps_insertion_order() {
    let store = DocumentStore::in_memory();
    for id in ["c-1", "c-2", "c-3"] {
        store
            .save(Collection::Courses, &json!({"id": id, "title": id, "subject": "CS"}))
            .await
            .unwrap();
    }

    let replaced = json!({"id": "c-1", "title": "Algorithms II", "subject": "CS"});
    store.update(Collection::Courses, &replaced).await.unwrap();
    let inserted = json!({"id": "c-4", "title": "Compilers", "subject": "CS"});
    store.update(Collection::Courses, &inserted).await.unwrap();

    let ids: Vec<String> = store
        .find_all(Collection::Courses)
        .await
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["c-1", "c-2", "c-3", "c-4"]);
    assert_eq!(
        store.find_by_id(Collection::Courses, "c-1").await.unwrap(),
        Some(replaced)
    );
}

#[tokio::test]
async fn index_lookups_match_nested_key_paths() {
    let store = DocumentStore::in_memory();
    let taught = json!({
        "id": "c-1",
        "title": "Algorithms",
        "subject": "CS",
        "teacher": {"id": "t-1", "name": "Grace", "email": "grace@example.com"},
    });
    let untaught = json!({"id": "c-2", "title": "Poetry", "subject": "Arts"});
    store.save(Collection::Courses, &taught).await.unwrap();
    store.save(Collection::Courses, &untaught).await.unwrap();

    let by_teacher = store
        .find_all_by_index(Collection::Courses, "teacher.id", "t-1")
        .await
        .unwrap();
    assert_eq!(by_teacher, vec![taught]);

    let by_subject = store
        .find_by_index(Collection::Courses, "subject", "Arts")
        .await
        .unwrap();
    assert_eq!(by_subject, Some(untaught));

    let none = store
        .find_by_index(Collection::Courses, "subject", "History")
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn unknown_index_is_an_error() {
    let store = DocumentStore::in_memory();
    let err = store
        .find_by_index(Collection::Resources, "email", "x@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownIndex { .. }));
}

#[tokio::test]
async fn unique_index_violation_is_a_constraint_error() {
    let store = DocumentStore::in_memory();
    store
        .save(Collection::Teachers, &json!({"id": "t-1", "email": "grace@example.com"}))
        .await
        .unwrap();

    let err = store
        .save(Collection::Teachers, &json!({"id": "t-2", "email": "grace@example.com"}))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConstraintViolation { collection: Collection::Teachers, .. }
    ));
}

#[tokio::test]
async fn delete_reports_whether_a_document_was_removed() {
    let store = DocumentStore::in_memory();
    store
        .save(Collection::Resources, &json!({"id": "r-1", "name": "Projector"}))
        .await
        .unwrap();

    assert!(store.delete(Collection::Resources, "r-1").await.unwrap());
    assert!(!store.delete(Collection::Resources, "r-1").await.unwrap());
    assert_eq!(store.count(Collection::Resources).await.unwrap(), 0);
}

#[tokio::test]
async fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("school.sqlite3");
    let document = json!({"id": "s-1", "name": "Ada", "email": "ada@example.com"});

    let store = DocumentStore::new(StoreConfig::file(&path));
    store.save(Collection::Students, &document).await.unwrap();
    drop(store);

    let reopened = DocumentStore::new(StoreConfig::file(&path));
    let found = reopened
        .find_by_index(Collection::Students, "email", "ada@example.com")
        .await
        .unwrap();
    assert_eq!(found, Some(document));
}
