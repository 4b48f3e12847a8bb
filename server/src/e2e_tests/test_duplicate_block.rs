//! Test duplicating a block with its whole subtree.

use axum::http::StatusCode;

use crate::api::views::BlockView;
use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_duplicate_clones_structure_with_fresh_ids() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B")]);
    test.insert_ok(vec![op(1, 0, "A1"), op(1, 1, "A2")]);

    let response = test.duplicate(1);
    assert_eq!(response.status(), StatusCode::CREATED);
    let clone: BlockView = test.json(response);

    assert_eq!(clone.content, "A");
    let children: Vec<_> = clone.children.iter().map(|child| child.content.as_str()).collect();
    assert_eq!(children, vec!["A1", "A2"]);

    // every id in the clone is fresh
    let used = [1, 2, 3, 4];
    assert!(!used.contains(&clone.id.0));
    for child in &clone.children {
        assert!(!used.contains(&child.id.0));
    }

    // the clone sits immediately after the original among its siblings
    assert_eq!(test.export(), "A\n  A1\n  A2\nA\n  A1\n  A2\nB\n");
}

#[test]
fn test_duplicate_missing_block_is_not_found() {
    let test = TestClient::new();

    let response = test.duplicate(42);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.error_message(response), "block 42 does not exist");
}

#[test]
fn test_duplicate_root_sentinel_is_not_found() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    // the top level is not a block and cannot be duplicated
    let response = test.duplicate(0);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
