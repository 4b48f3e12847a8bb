//! Test that an out-of-range insert index appends instead of failing.

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_index_past_end_appends() {
    let test = TestClient::new();

    test.insert_ok(vec![op(0, 0, "A"), op(0, 99, "B")]);

    assert_eq!(test.export(), "A\nB\n");
}

#[test]
fn test_index_zero_prepends() {
    let test = TestClient::new();

    test.insert_ok(vec![op(0, 0, "A"), op(0, 0, "B")]);

    assert_eq!(test.export(), "B\nA\n");
}
