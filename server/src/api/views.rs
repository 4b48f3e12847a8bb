//! Wire payloads for the HTTP adapter.

use serde::{Deserialize, Serialize};

use crate::store::{Block, BlockId, InsertOperation};

/// Body of `POST /blocks/bulk-insert`.
#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub operations: Vec<InsertOperationRequest>,
}

/// One insert instruction within a bulk request.
#[derive(Debug, Deserialize)]
pub struct InsertOperationRequest {
    /// Parent to insert under; 0 targets the document's top level.
    pub parent_id: BlockId,
    /// Position among the parent's children; defaults to 0.
    #[serde(default)]
    pub index: usize,
    pub content: String,
}

impl From<InsertOperationRequest> for InsertOperation {
    fn from(request: InsertOperationRequest) -> Self {
        Self {
            parent_id: request.parent_id,
            index: request.index,
            content: request.content,
        }
    }
}

/// Body of `POST /blocks/{id}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// New parent; 0 targets the document's top level.
    pub new_parent_id: BlockId,
    /// Position among the new parent's children; defaults to 0.
    #[serde(default)]
    pub index: usize,
}

/// Comma-separated id list, e.g. `GET /blocks?ids=1,2,3`.
#[derive(Debug, Deserialize)]
pub struct IdListQuery {
    pub ids: String,
}

impl IdListQuery {
    /// Parse the comma-separated list into block ids.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first token that is not an unsigned
    /// integer. An empty list is rejected the same way.
    pub fn block_ids(&self) -> Result<Vec<BlockId>, String> {
        self.ids
            .split(',')
            .map(str::trim)
            .map(|token| {
                token
                    .parse::<u64>()
                    .map(BlockId)
                    .map_err(|_| format!("block id parameter '{token}' is not an id"))
            })
            .collect()
    }
}

/// A block as returned to clients, children nested in display order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockView {
    pub id: BlockId,
    pub content: String,
    pub children: Vec<BlockView>,
}

impl BlockView {
    #[must_use]
    pub fn from_block(block: &Block) -> Self {
        Self {
            id: block.id,
            content: block.content.clone(),
            children: block.children.ordered_values().map(Self::from_block).collect(),
        }
    }
}

/// Error body returned alongside every non-2xx status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
