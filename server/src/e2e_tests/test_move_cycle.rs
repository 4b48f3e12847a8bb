//! Test that a block can never move into its own subtree.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_move_into_own_descendant_is_rejected() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);
    test.insert_ok(vec![op(1, 0, "B")]);
    test.insert_ok(vec![op(2, 0, "C")]);

    let before = test.export();

    let response = test.move_block(1, 3, 0);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        test.error_message(response),
        "block 1 cannot move under 3, its own descendant"
    );
    // a rejected move leaves the document untouched
    assert_eq!(test.export(), before);
}

#[test]
fn test_move_under_itself_is_rejected() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    let response = test.move_block(1, 1, 0);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test.export(), "A\n");
}

#[test]
fn test_move_to_any_other_ancestor_is_permitted() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);
    test.insert_ok(vec![op(1, 0, "B")]);
    test.insert_ok(vec![op(2, 0, "C")]);

    // moving C under A hops one level up, which is fine
    let response = test.move_block(3, 1, 0);

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(test.export(), "A\n  C\n  B\n");
}
