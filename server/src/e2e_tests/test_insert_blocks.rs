//! Test inserting blocks through the bulk endpoint.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};
use crate::store::BlockId;

#[test]
fn test_insert_at_top_level() {
    let test = TestClient::new();

    let created = test.insert_ok(vec![op(0, 0, "Block 1"), op(0, 1, "Block 2")]);

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].id, BlockId(1));
    assert_eq!(created[0].content, "Block 1");
    assert!(created[0].children.is_empty());
    assert_eq!(created[1].id, BlockId(2));
    assert_eq!(created[1].content, "Block 2");
}

#[test]
fn test_insert_nested_under_created_block() {
    let test = TestClient::new();

    let created = test.insert_ok(vec![op(0, 0, "parent")]);
    let parent = created[0].id.0;

    let children = test.insert_ok(vec![op(parent, 0, "child")]);
    assert_eq!(children[0].content, "child");

    let fetched = test.fetch_ok(&parent.to_string());
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].children.len(), 1);
    assert_eq!(fetched[0].children[0].content, "child");
}

#[test]
fn test_insert_response_preserves_request_order() {
    let test = TestClient::new();

    let created = test.insert_ok(vec![op(0, 0, "first"), op(0, 1, "second"), op(0, 2, "third")]);

    let contents: Vec<_> = created.iter().map(|block| block.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[test]
fn test_insert_empty_batch_creates_nothing() {
    let test = TestClient::new();

    let response = test.insert(vec![]);
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(test.export(), "");
}
