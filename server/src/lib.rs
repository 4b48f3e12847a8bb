// Life of a request:
// 1. JSON (or an id list in the query string) comes in over HTTP
// 2. The api layer decodes it into typed payloads
// 3. The store applies the operation to the document tree, whole-operation
//    under the document lock (write for mutations, read for fetch/export)
// 4. The api layer maps the result (or the StoreError) back to a status
//    code and JSON body
//
// System components:
//  - Document tree store (ordered child collections + parent table)
//  - Monotonic block id generator
//  - HTTP adapter (axum)

// Forbid unwrap() in production code to prevent panics from bad payloads.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod config;
mod e2e_tests;
pub mod store;
