//! In-memory document tree store.
//!
//! The document is a single tree of content blocks. Each block owns an
//! ordered collection of children; ancestry is tracked separately in a
//! parent-lookup table so the object graph stays strictly tree-shaped.
//!
//! # Invariants
//!
//! These hold before and after every public operation:
//!
//! - Every id in the parent table names exactly one block, reachable from
//!   the top level along the chain the table implies.
//! - A block appears in exactly one child collection: its parent's (the top
//!   level when the recorded parent is [`ROOT`]).
//! - Ids are unique document-wide, never reused, and increase in allocation
//!   order.
//! - Walking the parent table from any id toward [`ROOT`] terminates.
//! - Collection order is the authoritative display and export order.

mod block;
mod document;
mod error;
mod id;
mod ordered_map;

pub use block::{Block, BlockId, ROOT};
pub use document::{DocumentStore, InsertOperation};
pub use error::StoreError;
pub use id::IdGenerator;
pub use ordered_map::OrderedMap;
