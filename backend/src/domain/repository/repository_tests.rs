//! Unit tests for the checker, pager and CRUD repository.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::error_strategy::{Classification, MockErrorStrategy};
use crate::domain::models::{
    Invoice, InvoiceDraft, InvoiceStatus, Message, MessageDraft, User, UserDraft,
};
use crate::domain::ports::StoreError;
use crate::domain::{
    Activatable, EntityId, ErrorKind, ErrorStrategy, Failure, Filter, Identifiable,
    MappedErrorStrategy, TenantId, TenantScoped,
};
use crate::outbound::memory::{InMemoryDatabase, InMemoryUnitOfWork};

fn unconfigured() -> Arc<dyn ErrorStrategy> {
    Arc::new(MappedErrorStrategy::unconfigured())
}

fn user(name: &str) -> User {
    User::new(
        EntityId::new(),
        TenantId::new(),
        UserDraft {
            display_name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
        },
        Utc::now(),
    )
    .expect("valid user")
}

#[fixture]
fn db() -> InMemoryDatabase {
    InMemoryDatabase::new()
}

fn users(db: &InMemoryDatabase) -> UserRepository<InMemoryUnitOfWork> {
    db.scope(unconfigured(), 100).users()
}

#[rstest]
#[tokio::test]
async fn created_entities_read_back_equal(db: InMemoryDatabase) {
    let repo = users(&db);
    let alice = user("Alice");

    let created = repo.create(alice.clone()).await;
    assert!(created.is_successful(), "{}", created.message());

    let read = repo.read_by_id(&alice.id().to_string()).await;
    assert_eq!(read.data(), Some(&alice));
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_ids_are_invalid_data(db: InMemoryDatabase, #[case] id: &str) {
    let op = users(&db).read_by_id(id).await;
    assert_eq!(op.error_kind(), ErrorKind::InvalidData);
    assert_eq!(db.round_trips(), 0);
}

#[rstest]
#[tokio::test]
async fn malformed_ids_fail_without_touching_the_store(db: InMemoryDatabase) {
    let repo = users(&db);
    for op in [
        repo.read_by_id("NOT_ID").await.map(|_| ()),
        repo.delete("NOT_ID").await.map(|_| ()),
        repo.activate("NOT_ID").await.map(|_| ()),
    ] {
        assert_eq!(op.error_kind(), ErrorKind::BusinessValidation);
    }
    assert_eq!(db.round_trips(), 0);
}

#[rstest]
#[tokio::test]
async fn absent_entities_are_reported_as_not_found(db: InMemoryDatabase) {
    let repo = users(&db);
    let missing = EntityId::new().to_string();

    let read = repo.read_by_id(&missing).await;
    assert_eq!(read.error_kind(), ErrorKind::BusinessValidation);
    assert_eq!(read.message(), "User not found");

    let deleted = repo.delete(&missing).await;
    assert!(!deleted.is_successful());
    assert!(!deleted.into_data_or_default());

    let deactivated = repo.deactivate(&missing).await;
    assert_eq!(deactivated.error_kind(), ErrorKind::BusinessValidation);

    let activated = repo.activate(&missing).await;
    assert_eq!(activated.error_kind(), ErrorKind::BusinessValidation);
    assert_eq!(activated.message(), "User not found");
    assert!(!activated.into_data_or_default());

    let updated = repo.update(user("Ghost")).await;
    assert_eq!(updated.error_kind(), ErrorKind::BusinessValidation);
    assert_eq!(updated.message(), "User not found");
    assert!(updated.data().is_none());

    assert!(db.committed::<User>().is_empty());
}

#[rstest]
fn has_entity_rejects_absent_references() {
    let op = EntityChecker::<User, InMemoryUnitOfWork>::has_entity(None);
    assert_eq!(op.error_kind(), ErrorKind::BusinessValidation);
    let alice = user("Alice");
    let op = EntityChecker::<User, InMemoryUnitOfWork>::has_entity(Some(alice.clone()));
    assert_eq!(op.into_data(), Some(alice));
}

#[rstest]
#[tokio::test]
async fn activation_round_trips(db: InMemoryDatabase) {
    let repo = users(&db);
    let alice = user("Alice");
    let id = alice.id().to_string();
    repo.create(alice).await;

    assert_eq!(repo.deactivate(&id).await.data(), Some(&true));
    let stored = repo.read_by_id(&id).await.into_data().expect("stored user");
    assert!(!stored.is_active());

    assert_eq!(repo.activate(&id).await.data(), Some(&true));
    let stored = repo.read_by_id(&id).await.into_data().expect("stored user");
    assert!(stored.is_active());
}

#[rstest]
#[tokio::test]
async fn store_failures_are_classified_by_the_scope_strategy(db: InMemoryDatabase) {
    let mut strategy = MockErrorStrategy::new();
    strategy
        .expect_classify()
        .withf(|failure: &Failure| failure.type_name() == "StoreTimeoutError")
        .times(1)
        .returning(|failure: &Failure| {
            Classification::new(ErrorKind::Timeout, format!("slow: {}", failure.detail()))
        });
    let repo = db.scope(Arc::new(strategy), 100).users();
    db.inject_fault(StoreError::timeout("5s"));

    let op = repo.read_filter(Filter::all()).await;
    assert_eq!(op.error_kind(), ErrorKind::Timeout);
    assert_eq!(op.message(), "slow: 5s");
}

#[rstest]
#[tokio::test]
async fn failed_commits_leave_nothing_staged(db: InMemoryDatabase) {
    let scope = db.scope(unconfigured(), 100);
    let repo = scope.users();
    db.inject_fault(StoreError::connection("reset"));

    let op = repo.create(user("Alice")).await;
    assert_eq!(op.error_kind(), ErrorKind::NullExceptionStrategy);
    assert_eq!(scope.unit_of_work().pending(), 0);
    assert!(db.committed::<User>().is_empty());
}

#[rstest]
#[tokio::test]
async fn duplicate_creates_are_store_conflicts(db: InMemoryDatabase) {
    let repo = users(&db);
    let alice = user("Alice");
    repo.create(alice.clone()).await;

    let op = repo.create(alice).await;
    assert!(!op.is_successful());
    assert_eq!(op.error_kind(), ErrorKind::NullExceptionStrategy);
}

#[rstest]
#[tokio::test]
async fn offset_pages_are_zero_based_and_ordered_by_id(db: InMemoryDatabase) {
    let repo = users(&db);
    let mut created = Vec::new();
    for name in ["Ann", "Ben", "Cat"] {
        let entity = user(name);
        repo.create(entity.clone()).await;
        created.push(entity);
    }
    created.sort_by_key(Identifiable::id);

    let first = repo.read_filter_page(Filter::all(), 0, 2).await;
    assert_eq!(first.data(), Some(&created[..2].to_vec()));
    let second = repo.read_filter_page(Filter::all(), 1, 2).await;
    assert_eq!(second.data(), Some(&created[2..].to_vec()));

    let zero = repo.read_filter_page(Filter::all(), 0, 0).await;
    assert_eq!(zero.error_kind(), ErrorKind::InvalidData);
}

#[rstest]
#[tokio::test]
async fn invoice_updates_merge_only_editable_fields(db: InMemoryDatabase) {
    let repo = db.scope(unconfigured(), 100).invoices();
    let draft = InvoiceDraft {
        customer_id: EntityId::new(),
        number: "INV-7".to_owned(),
        amount_cents: 100,
        currency: "GBP".to_owned(),
        status: InvoiceStatus::Draft,
    };
    let issued_at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().expect("timestamp");
    let stored = Invoice::new(EntityId::new(), TenantId::new(), draft.clone(), issued_at)
        .expect("valid invoice");
    repo.create(stored.clone()).await;

    let edited = Invoice::new(
        stored.id(),
        TenantId::new(),
        InvoiceDraft {
            amount_cents: 250,
            status: InvoiceStatus::Issued,
            number: "CHANGED".to_owned(),
            ..draft
        },
        issued_at + Duration::days(3),
    )
    .expect("valid invoice");

    let merged = repo.update(edited).await.into_data().expect("updated");
    assert_eq!(merged.amount_cents(), 250);
    assert_eq!(merged.status(), InvoiceStatus::Issued);
    assert_eq!(merged.number(), "INV-7");
    assert_eq!(merged.issued_at(), issued_at);
    assert_eq!(merged.tenant_id(), stored.tenant_id());
}

#[rstest]
#[tokio::test]
async fn message_pages_follow_send_order(db: InMemoryDatabase) {
    let repo = db.scope(unconfigured(), 100).messages();
    let tenant = TenantId::new();
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("timestamp");
    for offset in [2, 0, 1] {
        let message = Message::new(
            EntityId::new(),
            tenant,
            MessageDraft {
                sender_id: EntityId::new(),
                recipient_id: EntityId::new(),
                body: format!("message {offset}"),
            },
            start + Duration::minutes(offset),
        )
        .expect("valid message");
        repo.create(message).await;
    }

    let page = repo
        .get_page(Filter::for_tenant(tenant), None, 2)
        .await
        .into_data()
        .expect("page");
    let bodies: Vec<_> = page.items().iter().map(Message::body).collect();
    assert_eq!(bodies, vec!["message 0", "message 1"]);
    assert_eq!(page.total_count(), 3);
    assert!(page.next_cursor().is_some());
}

#[rstest]
#[tokio::test]
async fn undecodable_cursors_are_invalid_data(db: InMemoryDatabase) {
    let op = users(&db).get_page(Filter::all(), Some("garbage"), 5).await;
    assert_eq!(op.error_kind(), ErrorKind::InvalidData);
    assert_eq!(db.round_trips(), 0);
}

#[rstest]
#[tokio::test]
async fn oversized_pages_are_clamped(db: InMemoryDatabase) {
    let repo = db.scope(unconfigured(), 2).users();
    for name in ["Ann", "Ben", "Cat"] {
        repo.create(user(name)).await;
    }

    let page = repo
        .get_page(Filter::all(), None, 50)
        .await
        .into_data()
        .expect("page");
    assert_eq!(page.items().len(), 2);
    assert!(page.has_next());
}
