//! Test deleting blocks and their subtrees.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_delete_removes_block_and_descendants() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "parent"), op(0, 1, "sibling")]);
    test.insert_ok(vec![op(1, 0, "child")]);
    test.insert_ok(vec![op(3, 0, "grandchild")]);

    let response = test.delete("1");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // the whole subtree is gone, the sibling survives
    assert!(test.fetch_ok("1,3,4").is_empty());
    assert_eq!(test.export(), "sibling\n");
}

#[test]
fn test_delete_is_idempotent() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B")]);

    assert_eq!(test.delete("1").status(), StatusCode::NO_CONTENT);
    assert_eq!(test.delete("1").status(), StatusCode::NO_CONTENT);

    assert_eq!(test.export(), "B\n");
}

#[test]
fn test_delete_unknown_and_root_ids_are_skipped() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    let response = test.delete("42,0");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(test.export(), "A\n");
}

#[test]
fn test_delete_rejects_malformed_ids() {
    let test = TestClient::new();

    let response = test.delete("not-an-id");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
