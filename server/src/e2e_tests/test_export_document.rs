//! Test the plain-text export of the whole document.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;

use crate::api;
use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_export_indents_two_spaces_per_level() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B")]);
    test.insert_ok(vec![op(1, 0, "A1")]);

    assert_eq!(test.export(), "A\n  A1\nB\n");
}

#[test]
fn test_export_empty_document_is_empty() {
    let test = TestClient::new();

    assert_eq!(test.export(), "");
}

#[test]
fn test_export_reflects_later_edits() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A"), op(0, 1, "B")]);
    assert_eq!(test.export(), "A\nB\n");

    test.move_block(1, 2, 0);
    assert_eq!(test.export(), "B\n  A\n");

    test.delete("2");
    assert_eq!(test.export(), "");
}

#[test]
fn test_export_is_plain_text() {
    let test = TestClient::new();
    test.insert_ok(vec![op(0, 0, "A")]);

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let response = runtime.block_on(api::export_document(State(test.state())));

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/plain"),
        "unexpected content type: {content_type}"
    );
}
