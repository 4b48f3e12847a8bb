//! Test that separate connections see one shared document.

use crate::e2e_tests::helpers::{TestClient, op};

#[test]
fn test_sibling_clients_share_the_document() {
    let test = TestClient::new();
    let sibling = test.sibling();

    test.insert_ok(vec![op(0, 0, "written by first")]);
    sibling.insert_ok(vec![op(0, 1, "written by second")]);

    // both clients observe both writes, in one order
    assert_eq!(test.export(), "written by first\nwritten by second\n");
    assert_eq!(sibling.export(), test.export());

    let fetched = sibling.fetch_ok("1,2");
    assert_eq!(fetched.len(), 2);
}

#[test]
fn test_ids_keep_increasing_across_clients() {
    let test = TestClient::new();
    let sibling = test.sibling();

    let first = test.insert_ok(vec![op(0, 0, "one")]);
    let second = sibling.insert_ok(vec![op(0, 1, "two")]);

    assert!(second[0].id > first[0].id);
}
