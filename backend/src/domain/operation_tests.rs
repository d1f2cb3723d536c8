//! Unit tests for the operation result type.

use rstest::rstest;
use serde::Deserialize;
use serde_json::json;

use super::*;
use crate::domain::error_strategy::{BusinessStrategy, Classification, MockErrorStrategy};

fn database_strategy() -> MockErrorStrategy {
    let mut strategy = MockErrorStrategy::new();
    strategy
        .expect_classify()
        .times(1)
        .returning(|failure: &Failure| {
            Classification::new(ErrorKind::Database, format!("db: {}", failure.detail()))
        });
    strategy
}

#[rstest]
fn success_carries_data_and_no_error_kind() {
    let op = Operation::success_with_message(7_u32, "created");
    assert!(op.is_successful());
    assert_eq!(op.data(), Some(&7));
    assert_eq!(op.message(), "created");
    assert_eq!(op.error_kind(), ErrorKind::None);
    assert!(op.failure().is_none());
}

#[rstest]
fn failure_consults_the_strategy_once() {
    let strategy = database_strategy();
    let op: Operation<u32> = Operation::fail(&Failure::new("StoreQueryError", "boom"), &strategy);

    assert!(!op.is_successful());
    assert_eq!(op.data(), None);
    assert_eq!(op.error_kind(), ErrorKind::Database);
    assert_eq!(op.message(), "db: boom");
}

#[rstest]
fn strategies_answering_none_are_coerced_to_unexpected() {
    let mut strategy = MockErrorStrategy::new();
    strategy
        .expect_classify()
        .returning(|_| Classification::new(ErrorKind::None, "confused"));

    let op: Operation<()> = Operation::fail(&Failure::new("Any", "x"), &strategy);
    assert_eq!(op.error_kind(), ErrorKind::Unexpected);
    assert_eq!(op.message(), "confused");
}

#[rstest]
fn failed_bool_operations_default_to_false() {
    let op: Operation<bool> = Operation::fail(&Failure::rule("missing"), &BusinessStrategy::rule());
    assert!(!op.into_data_or_default());
}

#[rstest]
fn map_and_and_then_only_touch_successes() {
    let doubled = Operation::success(2_u32).map(|n| n * 2);
    assert_eq!(doubled.data(), Some(&4));

    let failed: Operation<u32> = Operation::fail(&Failure::rule("no"), &BusinessStrategy::rule());
    let chained = failed.and_then(|n| Operation::success(n + 1));
    assert_eq!(chained.error_kind(), ErrorKind::BusinessValidation);
    assert_eq!(chained.message(), "no");
}

#[rstest]
fn into_result_exposes_the_failure() {
    let op: Operation<u32> = Operation::fail(
        &Failure::invalid_data("id must not be empty"),
        &BusinessStrategy::invalid_data(),
    );
    let err = op.into_result().expect_err("failed operation");
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(err.to_string(), "InvalidData: id must not be empty");
}

#[rstest]
fn serialises_with_camel_case_fields() {
    let value = serde_json::to_value(Operation::success(true)).expect("serialise");
    assert_eq!(
        value,
        json!({ "isSuccessful": true, "data": true, "message": "", "errorKind": "None" })
    );

    let failed: Operation<bool> =
        Operation::fail(&Failure::rule("gone"), &BusinessStrategy::rule());
    let value = serde_json::to_value(failed).expect("serialise");
    assert_eq!(
        value,
        json!({
            "isSuccessful": false,
            "data": null,
            "message": "gone",
            "errorKind": "BusinessValidation"
        })
    );
}

#[rstest]
fn deserialises_valid_payloads() {
    let op: Operation<u32> = serde_json::from_value(json!({
        "isSuccessful": false,
        "message": "timed out",
        "errorKind": "Timeout"
    }))
    .expect("valid payload");
    assert_eq!(op.error_kind(), ErrorKind::Timeout);
    assert_eq!(op.message(), "timed out");
}

/// Payload type with no `Default` impl.
#[derive(Debug, Deserialize)]
struct Receipt {
    number: String,
}

#[rstest]
fn failures_decode_without_data_for_payloads_lacking_default() {
    let op: Operation<Receipt> = serde_json::from_value(json!({
        "isSuccessful": false,
        "message": "store offline",
        "errorKind": "Network"
    }))
    .expect("failure payload without data");
    assert!(op.data().is_none());
    assert_eq!(op.error_kind(), ErrorKind::Network);

    let op: Operation<Receipt> = serde_json::from_value(json!({
        "isSuccessful": true,
        "data": { "number": "R-1" },
        "errorKind": "None"
    }))
    .expect("success payload");
    assert_eq!(op.data().map(|receipt| receipt.number.as_str()), Some("R-1"));
}

#[rstest]
#[case::success_with_kind(json!({ "isSuccessful": true, "data": 1, "errorKind": "Database" }))]
#[case::success_without_data(json!({ "isSuccessful": true, "errorKind": "None" }))]
#[case::failure_without_kind(json!({ "isSuccessful": false, "errorKind": "None" }))]
fn rejects_invariant_violations(#[case] payload: serde_json::Value) {
    let result: Result<Operation<u32>, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}
