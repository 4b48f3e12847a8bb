//! Test fetching blocks by id.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_fetch_returns_blocks_in_input_order() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B"), op(0, 2, "C")]);

    let fetched = test.fetch_ok("3,1,2");

    let contents: Vec<_> = fetched.iter().map(|block| block.content.as_str()).collect();
    assert_eq!(contents, vec!["C", "A", "B"]);
}

#[test]
fn test_fetch_insertion_order_round_trip() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "first"), op(0, 1, "second"), op(0, 2, "third")]);

    let fetched = test.fetch_ok("1,2,3");

    let contents: Vec<_> = fetched.iter().map(|block| block.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[test]
fn test_fetch_omits_missing_ids() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    let fetched = test.fetch_ok("42,1");

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].content, "A");
}

#[test]
fn test_fetch_root_sentinel_yields_nothing() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    // id 0 is the document's top level, not a block
    let fetched = test.fetch_ok("0");
    assert!(fetched.is_empty());
}

#[test]
fn test_fetch_nests_children_in_display_order() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "parent")]);
    test.insert_ok(vec![op(1, 0, "first"), op(1, 1, "second")]);
    test.insert_ok(vec![op(2, 0, "grandchild")]);

    let fetched = test.fetch_ok("1");

    assert_eq!(fetched.len(), 1);
    let children: Vec<_> = fetched[0]
        .children
        .iter()
        .map(|child| child.content.as_str())
        .collect();
    assert_eq!(children, vec!["first", "second"]);
    assert_eq!(fetched[0].children[0].children[0].content, "grandchild");
}

#[test]
fn test_fetch_rejects_malformed_ids() {
    let test = TestClient::new();

    let response = test.fetch("1,abc");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        test.error_message(response),
        "block id parameter 'abc' is not an id"
    );
}
