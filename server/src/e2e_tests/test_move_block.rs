//! Test moving blocks between parents and within one.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_move_to_front_shifts_existing_children() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "target"), op(0, 1, "moved")]);
    test.insert_ok(vec![op(1, 0, "first child"), op(1, 1, "second child")]);

    let response = test.move_block(2, 1, 0);
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        test.export(),
        "target\n  moved\n  first child\n  second child\n"
    );
}

#[test]
fn test_move_within_same_parent_reorders() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B"), op(0, 2, "C")]);

    let response = test.move_block(1, 0, 2);
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(test.export(), "B\nC\nA\n");
}

#[test]
fn test_move_to_top_level_from_depth() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);
    test.insert_ok(vec![op(1, 0, "B")]);
    test.insert_ok(vec![op(2, 0, "C")]);

    let response = test.move_block(3, 0, 0);
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(test.export(), "C\nA\n  B\n");
}

#[test]
fn test_move_missing_block_is_not_found() {
    let test = TestClient::new();

    let response = test.move_block(42, 0, 0);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.error_message(response), "block 42 does not exist");
}

#[test]
fn test_move_to_missing_parent_is_rejected() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    let response = test.move_block(1, 42, 0);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test.error_message(response), "parent block 42 does not exist");
    assert_eq!(test.export(), "A\n");
}
