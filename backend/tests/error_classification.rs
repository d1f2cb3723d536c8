//! Integration tests for store-failure classification and the operation
//! envelope callers receive.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tenant_backend::domain::models::{User, UserDraft};
use tenant_backend::domain::ports::StoreError;
use tenant_backend::domain::repository::{Create, EntityChecker, ReadById, ReadFilterCount};
use tenant_backend::domain::{
    EntityId, ErrorCatalogue, ErrorKind, ErrorMappingTable, Filter, Identifiable, TenantId,
};
use tenant_backend::outbound::memory::{InMemoryDatabase, InMemoryUnitOfWork};

fn bundled_map() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("error-map.json")
}

#[fixture]
fn catalogue() -> ErrorCatalogue {
    let catalogue = ErrorCatalogue::load(&bundled_map());
    assert!(catalogue.is_configured());
    catalogue
}

#[rstest]
#[case::connection(StoreError::connection("refused"), ErrorKind::Network)]
#[case::query(StoreError::query("syntax"), ErrorKind::Database)]
#[case::conflict(StoreError::conflict("duplicate key"), ErrorKind::Database)]
#[case::timeout(StoreError::timeout("5s"), ErrorKind::Timeout)]
#[case::transaction(StoreError::transaction("aborted"), ErrorKind::Database)]
#[tokio::test]
async fn the_bundled_map_classifies_every_store_failure(
    catalogue: ErrorCatalogue,
    #[case] fault: StoreError,
    #[case] expected: ErrorKind,
) {
    let db = InMemoryDatabase::new();
    let users = db.scope(Arc::new(catalogue.strategy()), 20).users();
    db.inject_fault(fault);

    let op = users.read_filter_count(Filter::all()).await;

    assert_eq!(op.error_kind(), expected);
    assert!(!op.message().is_empty());
}

#[rstest]
#[tokio::test]
async fn scopes_keep_the_table_they_started_with(catalogue: ErrorCatalogue) {
    let db = InMemoryDatabase::new();
    let before = db.scope(Arc::new(catalogue.strategy()), 20).users();

    catalogue.reload(
        ErrorMappingTable::from_json(
            r#"{ "version": 1, "default": { "kind": "Resource", "message": "busy: {detail}" } }"#,
        )
        .expect("valid table"),
    );
    let after = db.scope(Arc::new(catalogue.strategy()), 20).users();
    catalogue.clear();
    let cleared = db.scope(Arc::new(catalogue.strategy()), 20).users();

    db.inject_fault(StoreError::timeout("5s"));
    db.inject_fault(StoreError::timeout("5s"));
    db.inject_fault(StoreError::timeout("5s"));
    assert_eq!(
        before.read_filter_count(Filter::all()).await.error_kind(),
        ErrorKind::Timeout
    );
    let reloaded = after.read_filter_count(Filter::all()).await;
    assert_eq!(reloaded.error_kind(), ErrorKind::Resource);
    assert_eq!(reloaded.message(), "busy: 5s");
    assert_eq!(
        cleared.read_filter_count(Filter::all()).await.error_kind(),
        ErrorKind::NullExceptionStrategy
    );
}

#[rstest]
#[tokio::test]
async fn operations_serialise_to_the_caller_envelope(catalogue: ErrorCatalogue) {
    let db = InMemoryDatabase::new();
    let users = db.scope(Arc::new(catalogue.strategy()), 20).users();
    let user = User::new(
        EntityId::new(),
        TenantId::new(),
        UserDraft {
            display_name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
        },
        Utc::now(),
    )
    .expect("valid user");
    users.create(user.clone()).await;

    let found = users.read_by_id(&user.id().to_string()).await;
    let encoded = serde_json::to_value(&found).expect("serialise");
    assert_eq!(encoded["isSuccessful"], json!(true));
    assert_eq!(encoded["errorKind"], json!("None"));
    assert_eq!(encoded["data"]["displayName"], json!("Alice"));

    let missing = users.read_by_id("NOT_ID").await;
    let encoded = serde_json::to_value(&missing).expect("serialise");
    assert_eq!(encoded["isSuccessful"], json!(false));
    assert_eq!(encoded["errorKind"], json!("BusinessValidation"));
    assert_eq!(encoded["data"], Value::Null);
}

#[rstest]
fn optional_references_are_gated_before_use() {
    type UserChecker = EntityChecker<User, InMemoryUnitOfWork>;
    let owner: Option<User> = None;

    let gated = UserChecker::has_entity(owner);
    let encoded = serde_json::to_value(&gated).expect("serialise");

    assert_eq!(encoded["isSuccessful"], json!(false));
    assert_eq!(encoded["errorKind"], json!("BusinessValidation"));
    assert_eq!(encoded["message"], json!("User must be provided"));
}
