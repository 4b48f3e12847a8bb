//! Test the non-transactional abort of a bulk insert.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_missing_parent_rejects_batch() {
    let test = TestClient::new();

    let response = test.insert(vec![op(99, 0, "orphan")]);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test.error_message(response), "parent block 99 does not exist");
}

#[test]
fn test_operations_before_the_failure_stay_committed() {
    let test = TestClient::new();

    let response = test.insert(vec![
        op(0, 0, "first"),
        op(99, 0, "orphan"),
        op(0, 1, "never applied"),
    ]);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // the first operation landed, the rest of the batch did not
    let fetched = test.fetch_ok("1,2,3");
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].content, "first");
    assert_eq!(test.export(), "first\n");
}
