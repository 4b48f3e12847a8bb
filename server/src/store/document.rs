//! The document tree store and its mutation algorithms.
//!
//! The store owns three structures: the top-level block collection, the
//! parent table (child id to parent id, with [`ROOT`] standing in for the
//! top level), and the id generator. Ancestry lives only in the parent
//! table, never as back-pointers inside blocks, so ownership stays strictly
//! tree-shaped and subtree clone/detach reduces to copying or dropping
//! table entries.
//!
//! # Path resolution
//!
//! Every operation resolves its target the same way: walk the parent table
//! from the target id up to [`ROOT`] (cost bounded by depth, not tree size),
//! then descend the collections along that path in reverse. The parent table
//! promises that every id on the path exists in its parent's collection; a
//! miss during the descent means the two structures disagree, and the store
//! panics rather than letting a corrupt tree keep serving operations.
//!
//! # Locking
//!
//! The store has no internal synchronization. Callers wrap it in a document
//! lock (`Arc<RwLock<DocumentStore>>` at the HTTP layer) so each operation,
//! path resolution included, is observed as one atomic step. Id allocation
//! is atomic on its own and may happen many times inside one locked batch.

use std::collections::HashMap;

use crate::store::block::{Block, BlockId, ROOT};
use crate::store::error::StoreError;
use crate::store::id::IdGenerator;
use crate::store::ordered_map::OrderedMap;

/// A single insert instruction within a batch.
#[derive(Debug, Clone)]
pub struct InsertOperation {
    /// Parent to insert under; [`ROOT`] targets the document's top level.
    pub parent_id: BlockId,
    /// Position among the parent's children; clamped to the child count.
    pub index: usize,
    /// Content of the new block.
    pub content: String,
}

/// In-memory store for the single document tree.
#[derive(Debug)]
pub struct DocumentStore {
    /// The document's top level, depth 0.
    top_level: OrderedMap<Block>,
    /// Child id to parent id; [`ROOT`] means the top level.
    parents: HashMap<BlockId, BlockId>,
    ids: IdGenerator,
}

impl DocumentStore {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::new())
    }

    /// Create an empty document with a caller-supplied id generator.
    #[must_use]
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            top_level: OrderedMap::new(),
            parents: HashMap::new(),
            ids,
        }
    }

    /// Insert a batch of blocks, strictly in request order.
    ///
    /// Each operation resolves its parent, allocates a fresh id, records the
    /// parent entry, and inserts at the requested index (clamped to the
    /// child count). Returns the created blocks in request order.
    ///
    /// The batch is NOT transactional: a failing operation aborts the rest
    /// of the batch, but operations already applied stay committed. The
    /// error does not report which blocks were created before the failure.
    ///
    /// # Errors
    ///
    /// `ParentNotFound` if an operation's parent resolves to neither the
    /// root nor a known block.
    pub fn insert_blocks(
        &mut self,
        operations: Vec<InsertOperation>,
    ) -> Result<Vec<Block>, StoreError> {
        let mut created = Vec::with_capacity(operations.len());
        for operation in operations {
            let path = self
                .path_to_root(operation.parent_id)
                .map_err(|_| StoreError::ParentNotFound(operation.parent_id))?;
            let id = self.ids.next_id();
            self.parents.insert(id, operation.parent_id);
            let block = Block::new(id, operation.content);
            created.push(block.clone());
            let collection = Self::collection_at_mut(&mut self.top_level, &path);
            collection.insert_at(id, operation.index, block);
        }
        Ok(created)
    }

    /// Delete blocks and their entire subtrees. Never fails.
    ///
    /// Unknown ids are skipped, so deleting the same id twice is the same as
    /// deleting it once. Each deleted block is removed from its parent's
    /// collection and every descendant's parent entry is purged; the
    /// detached subtree becomes unreachable.
    pub fn delete_blocks(&mut self, ids: &[BlockId]) {
        for &id in ids {
            let Some(&parent) = self.parents.get(&id) else {
                // already gone, delete is idempotent
                continue;
            };
            let Ok(path) = self.path_to_root(parent) else {
                continue;
            };
            let collection = Self::collection_at_mut(&mut self.top_level, &path);
            let Some(removed) = collection.remove(id) else {
                panic!("document tree inconsistent: block {id} missing from its parent's collection");
            };
            self.parents.remove(&id);
            Self::unlink_subtree(&removed, &mut self.parents);
        }
    }

    /// Fetch blocks by id, in input order.
    ///
    /// Missing ids are silently omitted; this is a bulk filter, not a
    /// lookup that can fail.
    #[must_use]
    pub fn fetch_blocks(&self, ids: &[BlockId]) -> Vec<Block> {
        ids.iter()
            .filter_map(|&id| self.locate(id).ok())
            .map(|(block, _)| block.clone())
            .collect()
    }

    /// Clone the subtree rooted at `id` and insert the clone immediately
    /// after the original among its siblings.
    ///
    /// The clone is built top-down: every block in the subtree gets a fresh
    /// id, registered under its clone parent (the clone root under the
    /// original's parent). Content is copied verbatim and child order is
    /// preserved. Returns the cloned subtree.
    ///
    /// # Errors
    ///
    /// `BlockNotFound` if `id` has no parent entry.
    pub fn duplicate_block(&mut self, id: BlockId) -> Result<Block, StoreError> {
        let parent = self.parent_of(id)?;
        let path = self.path_to_root(parent)?;

        let collection = Self::collection_at(&self.top_level, &path);
        let Some((source, index)) = collection.get_with_index(id) else {
            panic!("document tree inconsistent: block {id} missing from its parent's collection");
        };
        let clone = Self::clone_subtree(source, parent, &self.ids, &mut self.parents);

        let duplicated = clone.clone();
        let collection = Self::collection_at_mut(&mut self.top_level, &path);
        collection.insert_at(duplicated.id, index + 1, clone);
        Ok(duplicated)
    }

    /// Move `id` under `new_parent` at `index` (clamped).
    ///
    /// All checks run before any mutation, so a failed move leaves the
    /// document untouched. Moving a block into its own direct or transitive
    /// subtree is the only rejected topology; any other target, including
    /// another ancestor or a reorder within the same parent, is permitted.
    ///
    /// # Errors
    ///
    /// `BlockNotFound` if `id` has no parent entry; `MoveCreatesCycle` if
    /// the walk from `new_parent` to the root passes through `id`;
    /// `ParentNotFound` if that walk hits a missing link.
    pub fn move_block(
        &mut self,
        id: BlockId,
        new_parent: BlockId,
        index: usize,
    ) -> Result<(), StoreError> {
        let old_parent = self.parent_of(id)?;
        let new_path = self.move_target_path(id, new_parent)?;
        let old_path = self.path_to_root(old_parent)?;

        let collection = Self::collection_at_mut(&mut self.top_level, &old_path);
        let Some(block) = collection.remove(id) else {
            panic!("document tree inconsistent: block {id} missing from its parent's collection");
        };
        self.parents.insert(id, new_parent);
        let collection = Self::collection_at_mut(&mut self.top_level, &new_path);
        collection.insert_at(id, index, block);
        Ok(())
    }

    /// Flatten the document to plain text, depth-first.
    ///
    /// Each block emits one line: two spaces per nesting level, then its
    /// content. Children follow their parent at the next depth.
    #[must_use]
    pub fn export(&self) -> String {
        let mut out = String::new();
        Self::export_level(&self.top_level, 0, &mut out);
        out
    }

    /// Parent of `id`, or `BlockNotFound` for ids the table does not know.
    /// That includes [`ROOT`], which is a parent target, not a block.
    fn parent_of(&self, id: BlockId) -> Result<BlockId, StoreError> {
        self.parents
            .get(&id)
            .copied()
            .ok_or(StoreError::BlockNotFound(id))
    }

    /// Chain of ids from `id` up to (excluding) [`ROOT`], leaf first.
    ///
    /// `path_to_root(ROOT)` is the empty path. A missing link in the chain
    /// is `BlockNotFound`.
    fn path_to_root(&self, id: BlockId) -> Result<Vec<BlockId>, StoreError> {
        let mut path = Vec::new();
        let mut current = id;
        while current != ROOT {
            path.push(current);
            match self.parents.get(&current) {
                Some(&parent) => current = parent,
                None => return Err(StoreError::BlockNotFound(current)),
            }
        }
        Ok(path)
    }

    /// Validated path to a move target: the walk from `target` toward the
    /// root must not pass through `id`, the block being moved.
    fn move_target_path(
        &self,
        id: BlockId,
        target: BlockId,
    ) -> Result<Vec<BlockId>, StoreError> {
        let mut path = Vec::new();
        let mut current = target;
        while current != ROOT {
            if current == id {
                return Err(StoreError::MoveCreatesCycle { block: id, target });
            }
            path.push(current);
            match self.parents.get(&current) {
                Some(&parent) => current = parent,
                None => return Err(StoreError::ParentNotFound(target)),
            }
        }
        Ok(path)
    }

    /// The block `id`, plus its position within its parent's collection.
    fn locate(&self, id: BlockId) -> Result<(&Block, usize), StoreError> {
        let parent = self.parent_of(id)?;
        let path = self.path_to_root(parent)?;
        let collection = Self::collection_at(&self.top_level, &path);
        let Some(found) = collection.get_with_index(id) else {
            panic!("document tree inconsistent: block {id} missing from its parent's collection");
        };
        Ok(found)
    }

    /// Descend from the top level along `path` (walked in reverse, so
    /// root-to-leaf) and return the child collection it ends at.
    ///
    /// # Panics
    ///
    /// A miss during the descent means the parent table references a block
    /// its parent's collection does not hold, which is invariant corruption.
    fn collection_at<'a>(
        top_level: &'a OrderedMap<Block>,
        path: &[BlockId],
    ) -> &'a OrderedMap<Block> {
        let mut collection = top_level;
        for &id in path.iter().rev() {
            collection = match collection.get(id) {
                Some(block) => &block.children,
                None => panic!(
                    "document tree inconsistent: block {id} missing from its parent's collection"
                ),
            };
        }
        collection
    }

    /// Mutable variant of [`Self::collection_at`].
    fn collection_at_mut<'a>(
        top_level: &'a mut OrderedMap<Block>,
        path: &[BlockId],
    ) -> &'a mut OrderedMap<Block> {
        let mut collection = top_level;
        for &id in path.iter().rev() {
            let current = collection;
            collection = match current.get_mut(id) {
                Some(block) => &mut block.children,
                None => panic!(
                    "document tree inconsistent: block {id} missing from its parent's collection"
                ),
            };
        }
        collection
    }

    /// Clone `source` top-down, allocating a fresh id for every block and
    /// registering each clone under its clone parent.
    fn clone_subtree(
        source: &Block,
        parent: BlockId,
        ids: &IdGenerator,
        parents: &mut HashMap<BlockId, BlockId>,
    ) -> Block {
        let id = ids.next_id();
        parents.insert(id, parent);
        let mut clone = Block::new(id, source.content.clone());
        for child in source.children.ordered_values() {
            let child_clone = Self::clone_subtree(child, id, ids, parents);
            clone.children.set(child_clone.id, child_clone);
        }
        clone
    }

    /// Purge parent entries for every descendant of a detached block.
    fn unlink_subtree(block: &Block, parents: &mut HashMap<BlockId, BlockId>) {
        for child in block.children.ordered_values() {
            parents.remove(&child.id);
            Self::unlink_subtree(child, parents);
        }
    }

    fn export_level(collection: &OrderedMap<Block>, depth: usize, out: &mut String) {
        for block in collection.ordered_values() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(&block.content);
            out.push('\n');
            Self::export_level(&block.children, depth + 1, out);
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(parent_id: BlockId, index: usize, content: &str) -> InsertOperation {
        InsertOperation {
            parent_id,
            index,
            content: content.to_string(),
        }
    }

    /// Insert a single block and return its id.
    fn insert_one(store: &mut DocumentStore, parent: BlockId, index: usize, content: &str) -> BlockId {
        let created = store
            .insert_blocks(vec![op(parent, index, content)])
            .expect("insert should succeed");
        created[0].id
    }

    /// Walk the tree and record each block's actual parent.
    fn collect_parents(
        collection: &OrderedMap<Block>,
        parent: BlockId,
        found: &mut HashMap<BlockId, BlockId>,
    ) {
        for block in collection.ordered_values() {
            let previous = found.insert(block.id, parent);
            assert!(
                previous.is_none(),
                "block {} appears in more than one collection",
                block.id
            );
            collect_parents(&block.children, block.id, found);
        }
    }

    /// Assert the parent table and the collections agree exactly, and that
    /// every parent chain terminates at the root.
    fn assert_tree_consistent(store: &DocumentStore) {
        let mut found = HashMap::new();
        collect_parents(&store.top_level, ROOT, &mut found);

        assert_eq!(
            found.len(),
            store.parents.len(),
            "parent table and tree disagree on block count"
        );
        for (id, parent) in &found {
            assert_eq!(
                store.parents.get(id),
                Some(parent),
                "parent table disagrees with the tree for block {id}"
            );
        }

        for &id in store.parents.keys() {
            let mut current = id;
            let mut steps = 0;
            while current != ROOT {
                current = *store
                    .parents
                    .get(&current)
                    .expect("parent chain hit a missing link");
                steps += 1;
                assert!(steps <= store.parents.len(), "parent chain from {id} cycles");
            }
        }
    }

    #[test]
    fn test_insert_creates_blocks_in_request_order() {
        let mut store = DocumentStore::new();

        let created = store
            .insert_blocks(vec![op(ROOT, 0, "Block 1"), op(ROOT, 1, "Block 2")])
            .expect("insert should succeed");

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].id, BlockId(1));
        assert_eq!(created[0].content, "Block 1");
        assert_eq!(created[1].id, BlockId(2));
        assert_eq!(created[1].content, "Block 2");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_insert_nested() {
        let mut store = DocumentStore::new();

        let parent = insert_one(&mut store, ROOT, 0, "parent");
        let child = insert_one(&mut store, parent, 0, "child");
        let grandchild = insert_one(&mut store, child, 0, "grandchild");

        let fetched = store.fetch_blocks(&[grandchild]);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].content, "grandchild");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_insert_under_missing_parent_aborts_remaining_batch() {
        let mut store = DocumentStore::new();

        let result = store.insert_blocks(vec![
            op(ROOT, 0, "first"),
            op(BlockId(99), 0, "orphan"),
            op(ROOT, 1, "never applied"),
        ]);

        assert_eq!(result, Err(StoreError::ParentNotFound(BlockId(99))));
        // the first operation stays committed, the rest of the batch does not
        let fetched = store.fetch_blocks(&[BlockId(1), BlockId(2), BlockId(3)]);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].content, "first");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut store = DocumentStore::new();

        insert_one(&mut store, ROOT, 0, "A");
        insert_one(&mut store, ROOT, 99, "B");

        assert_eq!(store.export(), "A\nB\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_fetch_preserves_input_order_and_filters_misses() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        let b = insert_one(&mut store, ROOT, 1, "B");
        let c = insert_one(&mut store, ROOT, 2, "C");

        let fetched = store.fetch_blocks(&[c, BlockId(42), a, b]);
        let contents: Vec<_> = fetched.iter().map(|block| block.content.as_str()).collect();
        assert_eq!(contents, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_fetch_root_sentinel_yields_nothing() {
        let mut store = DocumentStore::new();
        insert_one(&mut store, ROOT, 0, "A");

        assert!(store.fetch_blocks(&[ROOT]).is_empty());
    }

    #[test]
    fn test_delete_removes_subtree_and_is_idempotent() {
        let mut store = DocumentStore::new();

        let parent = insert_one(&mut store, ROOT, 0, "parent");
        let child = insert_one(&mut store, parent, 0, "child");
        let grandchild = insert_one(&mut store, child, 0, "grandchild");
        let sibling = insert_one(&mut store, ROOT, 1, "sibling");

        store.delete_blocks(&[parent]);

        assert!(store.fetch_blocks(&[parent, child, grandchild]).is_empty());
        assert_eq!(store.fetch_blocks(&[sibling]).len(), 1);
        assert_tree_consistent(&store);

        // deleting again changes nothing
        store.delete_blocks(&[parent]);
        assert_eq!(store.export(), "sibling\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_delete_unknown_id_is_a_noop() {
        let mut store = DocumentStore::new();
        insert_one(&mut store, ROOT, 0, "A");

        store.delete_blocks(&[BlockId(42), ROOT]);

        assert_eq!(store.export(), "A\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = DocumentStore::new();

        let first = insert_one(&mut store, ROOT, 0, "first");
        store.delete_blocks(&[first]);
        let second = insert_one(&mut store, ROOT, 0, "second");

        assert!(second > first);
    }

    #[test]
    fn test_duplicate_clones_subtree_with_fresh_ids() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        let a1 = insert_one(&mut store, a, 0, "A1");
        let a2 = insert_one(&mut store, a, 1, "A2");
        let a1x = insert_one(&mut store, a1, 0, "A1x");

        let clone = store.duplicate_block(a).expect("duplicate should succeed");

        // same content and structure, entirely fresh ids
        assert_eq!(clone.content, "A");
        assert_ne!(clone.id, a);
        let clone_children: Vec<_> = clone.children.ordered_values().collect();
        assert_eq!(clone_children.len(), 2);
        assert_eq!(clone_children[0].content, "A1");
        assert_eq!(clone_children[1].content, "A2");
        let clone_grandchild = clone_children[0]
            .children
            .ordered_values()
            .next()
            .expect("cloned child should keep its own child");
        assert_eq!(clone_grandchild.content, "A1x");

        let original_ids = [a, a1, a2, a1x];
        assert!(!original_ids.contains(&clone.id));
        assert!(!original_ids.contains(&clone_children[0].id));
        assert!(!original_ids.contains(&clone_children[1].id));
        assert!(!original_ids.contains(&clone_grandchild.id));

        // the clone sits immediately after the original
        assert_eq!(store.export(), "A\n  A1\n    A1x\n  A2\nA\n  A1\n    A1x\n  A2\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_duplicate_sits_between_siblings() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        insert_one(&mut store, ROOT, 1, "B");

        store.duplicate_block(a).expect("duplicate should succeed");

        assert_eq!(store.export(), "A\nA\nB\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_duplicate_missing_block() {
        let mut store = DocumentStore::new();

        let result = store.duplicate_block(BlockId(42));
        assert_eq!(result, Err(StoreError::BlockNotFound(BlockId(42))));

        // the root sentinel is not a block
        let result = store.duplicate_block(ROOT);
        assert_eq!(result, Err(StoreError::BlockNotFound(ROOT)));
    }

    #[test]
    fn test_move_to_front_shifts_existing_children() {
        let mut store = DocumentStore::new();

        let target = insert_one(&mut store, ROOT, 0, "target");
        insert_one(&mut store, target, 0, "first child");
        insert_one(&mut store, target, 1, "second child");
        let moved = insert_one(&mut store, ROOT, 1, "moved");

        store
            .move_block(moved, target, 0)
            .expect("move should succeed");

        assert_eq!(
            store.export(),
            "target\n  moved\n  first child\n  second child\n"
        );
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_move_within_same_parent_reorders() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        insert_one(&mut store, ROOT, 1, "B");
        insert_one(&mut store, ROOT, 2, "C");

        store.move_block(a, ROOT, 2).expect("move should succeed");

        assert_eq!(store.export(), "B\nC\nA\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_move_to_ancestor_is_permitted() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        let b = insert_one(&mut store, a, 0, "B");
        let c = insert_one(&mut store, b, 0, "C");

        store.move_block(c, ROOT, 0).expect("move should succeed");

        assert_eq!(store.export(), "C\nA\n  B\n");
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_move_into_own_subtree_fails_and_leaves_tree_unchanged() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        let b = insert_one(&mut store, a, 0, "B");
        let c = insert_one(&mut store, b, 0, "C");

        let before = store.export();

        let result = store.move_block(a, c, 0);
        assert_eq!(
            result,
            Err(StoreError::MoveCreatesCycle { block: a, target: c })
        );
        assert_eq!(store.export(), before);

        // moving a block under itself is the degenerate cycle
        let result = store.move_block(a, a, 0);
        assert_eq!(
            result,
            Err(StoreError::MoveCreatesCycle { block: a, target: a })
        );
        assert_eq!(store.export(), before);
        assert_tree_consistent(&store);
    }

    #[test]
    fn test_move_missing_block_and_missing_parent() {
        let mut store = DocumentStore::new();
        let a = insert_one(&mut store, ROOT, 0, "A");

        assert_eq!(
            store.move_block(BlockId(42), ROOT, 0),
            Err(StoreError::BlockNotFound(BlockId(42)))
        );
        assert_eq!(
            store.move_block(a, BlockId(42), 0),
            Err(StoreError::ParentNotFound(BlockId(42)))
        );
        assert_eq!(store.export(), "A\n");
    }

    #[test]
    fn test_move_index_past_end_appends() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        insert_one(&mut store, ROOT, 1, "B");

        store.move_block(a, ROOT, 99).expect("move should succeed");

        assert_eq!(store.export(), "B\nA\n");
    }

    #[test]
    fn test_export_indents_two_spaces_per_level() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        insert_one(&mut store, ROOT, 1, "B");
        insert_one(&mut store, a, 0, "A1");

        assert_eq!(store.export(), "A\n  A1\nB\n");
    }

    #[test]
    fn test_export_empty_document() {
        let store = DocumentStore::new();
        assert_eq!(store.export(), "");
    }

    #[test]
    fn test_mixed_sequence_keeps_tree_consistent() {
        let mut store = DocumentStore::new();

        let a = insert_one(&mut store, ROOT, 0, "A");
        let b = insert_one(&mut store, ROOT, 1, "B");
        let a1 = insert_one(&mut store, a, 0, "A1");
        assert_tree_consistent(&store);

        let clone = store.duplicate_block(a).expect("duplicate should succeed");
        assert_tree_consistent(&store);

        store.move_block(a1, b, 0).expect("move should succeed");
        assert_tree_consistent(&store);

        store.delete_blocks(&[clone.id, a]);
        assert_tree_consistent(&store);

        assert_eq!(store.export(), "B\n  A1\n");
    }
}
