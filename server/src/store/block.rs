//! Block identifiers and the tree node type.

use serde::{Deserialize, Serialize};

use crate::store::ordered_map::OrderedMap;

/// Identifier of a single block.
///
/// Serialized on the wire as a bare unsigned integer. Ids are allocated by
/// [`crate::store::IdGenerator`] starting at 1; id 0 is reserved for [`ROOT`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockId(pub u64);

/// Sentinel identifier for the document's top level.
///
/// Always a valid parent target, never an actual block: it has no entry in
/// the parent table and cannot be fetched, moved, duplicated, or deleted.
pub const ROOT: BlockId = BlockId(0);

impl BlockId {
    /// Whether this id is the top-level sentinel.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == ROOT.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the document tree.
///
/// A block owns its `children` exclusively; ancestry is recorded in the
/// store's parent table, never as a back-pointer inside the block.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    pub content: String,
    pub children: OrderedMap<Block>,
}

impl Block {
    /// Create a leaf block with no children.
    #[must_use]
    pub fn new(id: BlockId, content: String) -> Self {
        Self {
            id,
            content,
            children: OrderedMap::new(),
        }
    }
}
