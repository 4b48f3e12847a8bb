//! Error taxonomy for document tree operations.
//!
//! Only caller-facing failures live here. A disagreement between the parent
//! table and the child collections is invariant corruption, not an error
//! value: the store panics instead of letting a corrupt tree keep serving
//! mutations.

use crate::store::block::BlockId;

/// Errors returned by [`crate::store::DocumentStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced block has no entry in the parent table.
    BlockNotFound(BlockId),
    /// The referenced parent target is neither the root nor a known block.
    ParentNotFound(BlockId),
    /// The move target sits inside the subtree being moved.
    MoveCreatesCycle { block: BlockId, target: BlockId },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockNotFound(id) => write!(f, "block {id} does not exist"),
            Self::ParentNotFound(id) => write!(f, "parent block {id} does not exist"),
            Self::MoveCreatesCycle { block, target } => {
                write!(f, "block {block} cannot move under {target}, its own descendant")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_block_not_found() {
        let error = StoreError::BlockNotFound(BlockId(7));
        assert_eq!(error.to_string(), "block 7 does not exist");
    }

    #[test]
    fn test_display_parent_not_found() {
        let error = StoreError::ParentNotFound(BlockId(9));
        assert_eq!(error.to_string(), "parent block 9 does not exist");
    }

    #[test]
    fn test_display_move_creates_cycle() {
        let error = StoreError::MoveCreatesCycle {
            block: BlockId(3),
            target: BlockId(5),
        };
        assert_eq!(
            error.to_string(),
            "block 3 cannot move under 5, its own descendant"
        );
    }
}
