//! # Block Document
//!
//! The ordered collection of blocks for one course page.
//!
//! The document is the only owner of block ordering. Blocks are kept in
//! display order and every mutation finishes by reassigning `order` to each
//! block's position, so the order values are always exactly `0..N`.
//!
//! ## Lifecycle
//!
//! ```text
//! new / from_snapshot → add · remove · update · reorder → snapshot
//!        ↑                                                   ↓
//!   CourseStore::load_course                     CourseStore::save_course
//! ```

use coursecraft_common::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::block::{Block, BlockContent, BlockId, BlockKind};
use crate::mutations::{check_content, Mutation, MutationError, MutationOutcome, MutationResult};

/// Persistable copy of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub version: u64,
    pub blocks: Vec<Block>,
}

/// Editable block document
#[derive(Debug, Clone)]
pub struct BlockDocument {
    course_id: String,
    title: String,

    /// Increments on each effective mutation
    version: u64,

    /// Display order; `blocks[i].order == i`
    blocks: Vec<Block>,

    ids: IdGenerator,
}

impl BlockDocument {
    /// Create an empty document
    pub fn new(course_id: impl Into<String>) -> Self {
        let course_id = course_id.into();
        let ids = IdGenerator::new(&course_id);

        Self {
            course_id,
            title: String::new(),
            version: 0,
            blocks: Vec::new(),
            ids,
        }
    }

    /// Rebuild a document from a persisted snapshot
    ///
    /// Blocks are sorted by their stored order and re-densified, so a
    /// snapshot with gaps loads as a valid document. Duplicate ids and
    /// malformed payloads are rejected.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Result<Self, MutationError> {
        let mut doc = Self::new(snapshot.course_id);
        doc.title = snapshot.title;
        doc.version = snapshot.version;

        let mut seen = HashSet::new();
        for block in &snapshot.blocks {
            if !seen.insert(block.id().clone()) {
                return Err(MutationError::DuplicateId(block.id().clone()));
            }
            block.content().validate()?;
            doc.ids.observe(block.id().as_str());
        }

        let mut blocks = snapshot.blocks;
        blocks.sort_by_key(|b| b.order);
        doc.blocks = blocks;
        doc.reindex();

        Ok(doc)
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            course_id: self.course_id.clone(),
            title: self.title.clone(),
            version: self.version,
            blocks: self.blocks.clone(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in display order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// Position of a block in display order
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Check the dense-order invariant
    pub fn is_dense(&self) -> bool {
        self.blocks.iter().enumerate().all(|(i, b)| b.order == i)
    }

    /// Append a block of `kind`
    ///
    /// Uses the type's default payload when `content` is `None`. The new
    /// block gets a fresh id and `order == len()`.
    pub fn add_block(
        &mut self,
        kind: BlockKind,
        content: Option<BlockContent>,
    ) -> Result<&Block, MutationError> {
        let content = match content {
            Some(content) => {
                check_content(None, kind, &content)?;
                content
            }
            None => kind.default_content(),
        };

        let id = self.fresh_id();
        let order = self.blocks.len();
        tracing::debug!("add_block: id={} kind={} order={}", id, kind, order);

        self.blocks.push(Block::new(id, order, content));
        self.version += 1;

        let index = self.blocks.len() - 1;
        Ok(&self.blocks[index])
    }

    /// Append a block by type name, rejecting names outside the closed set
    pub fn add_block_named(
        &mut self,
        kind: &str,
        content: Option<BlockContent>,
    ) -> Result<&Block, MutationError> {
        let kind: BlockKind = kind.parse()?;
        self.add_block(kind, content)
    }

    /// Add a block and move it to `index` through [`reorder`](Self::reorder)
    pub fn insert_block(
        &mut self,
        kind: BlockKind,
        content: Option<BlockContent>,
        index: usize,
    ) -> Result<BlockId, MutationError> {
        let id = self.add_block(kind, content)?.id().clone();
        self.reorder(&id, index)?;
        Ok(id)
    }

    /// Remove a block and close the gap it leaves
    pub fn remove_block(&mut self, id: &BlockId) -> Result<Block, MutationError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| MutationError::NotFound(id.clone()))?;

        let removed = self.blocks.remove(index);
        self.reindex();
        self.version += 1;
        tracing::debug!("remove_block: id={} was at {}", id, index);

        Ok(removed)
    }

    /// Replace a block's payload; the payload must match the block's type
    pub fn update_content(
        &mut self,
        id: &BlockId,
        content: BlockContent,
    ) -> Result<(), MutationError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| MutationError::NotFound(id.clone()))?;

        check_content(Some(id), self.blocks[index].kind(), &content)?;

        self.blocks[index].content = content;
        self.version += 1;
        tracing::debug!("update_content: id={}", id);

        Ok(())
    }

    /// Move a block to `target_index` (clamped to `0..len`)
    ///
    /// The block is taken out of the order-sorted sequence, reinserted at the
    /// target and every block's order is reassigned to its new position.
    /// Moving onto the current index is a no-op.
    pub fn reorder(
        &mut self,
        id: &BlockId,
        target_index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        let from = self
            .index_of(id)
            .ok_or_else(|| MutationError::NotFound(id.clone()))?;
        let to = target_index.min(self.blocks.len() - 1);

        if from == to {
            return Ok(MutationOutcome::Unchanged);
        }

        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.reindex();
        self.version += 1;
        tracing::debug!("reorder: id={} {} -> {}", id, from, to);

        Ok(MutationOutcome::Moved {
            block_id: id.clone(),
            from,
            to,
        })
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.version += 1;
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        tracing::debug!("apply: {}", mutation.name());

        let outcome = match mutation {
            Mutation::AddBlock { kind, content } => {
                MutationOutcome::Added(self.add_block(kind, content)?.id().clone())
            }
            Mutation::InsertBlock { kind, content, index } => {
                MutationOutcome::Added(self.insert_block(kind, content, index)?)
            }
            Mutation::RemoveBlock { block_id } => {
                self.remove_block(&block_id)?;
                MutationOutcome::Removed(block_id)
            }
            Mutation::UpdateContent { block_id, content } => {
                self.update_content(&block_id, content)?;
                MutationOutcome::Updated(block_id)
            }
            Mutation::Reorder { block_id, target_index } => self.reorder(&block_id, target_index)?,
            Mutation::SetTitle { title } => {
                self.set_title(title);
                MutationOutcome::TitleChanged
            }
        };

        Ok(MutationResult {
            version: self.version,
            outcome,
        })
    }

    fn fresh_id(&mut self) -> BlockId {
        loop {
            let id = BlockId::new(self.ids.new_id());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn reindex(&mut self) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.order = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{QuizContent, TextContent};

    fn orders(doc: &BlockDocument) -> Vec<(BlockKind, usize)> {
        doc.blocks().iter().map(|b| (b.kind(), b.order())).collect()
    }

    #[test]
    fn test_create_empty_document() {
        let doc = BlockDocument::new("basic-technology");
        assert_eq!(doc.version(), 0);
        assert!(doc.is_empty());
        assert!(doc.is_dense());
    }

    #[test]
    fn test_add_reorder_remove_scenario() {
        let mut doc = BlockDocument::new("basic-technology");

        let text = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
        let quiz = doc.add_block(BlockKind::Quiz, None).unwrap().id().clone();
        let image = doc.add_block(BlockKind::Image, None).unwrap().id().clone();
        assert_eq!(doc.get(&quiz).unwrap().order(), 1);

        doc.reorder(&quiz, 0).unwrap();
        assert_eq!(
            orders(&doc),
            vec![(BlockKind::Quiz, 0), (BlockKind::Text, 1), (BlockKind::Image, 2)]
        );

        doc.remove_block(&text).unwrap();
        assert_eq!(doc.get(&quiz).unwrap().order(), 0);
        assert_eq!(doc.get(&image).unwrap().order(), 1);
        assert!(doc.is_dense());
    }

    #[test]
    fn test_reorder_clamps_target() {
        let mut doc = BlockDocument::new("c");
        let first = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
        doc.add_block(BlockKind::Video, None).unwrap();

        let outcome = doc.reorder(&first, 99).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Moved {
                block_id: first.clone(),
                from: 0,
                to: 1
            }
        );
        assert_eq!(doc.index_of(&first), Some(1));
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut doc = BlockDocument::new("c");
        let id = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
        doc.add_block(BlockKind::Poll, None).unwrap();
        let version = doc.version();

        assert_eq!(doc.reorder(&id, 0).unwrap(), MutationOutcome::Unchanged);
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_update_content_type_mismatch_is_rejected() {
        let mut doc = BlockDocument::new("c");
        let id = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
        let before = doc.snapshot();

        let err = doc
            .update_content(&id, BlockKind::Quiz.default_content())
            .unwrap_err();
        assert!(matches!(err, MutationError::TypeMismatch { .. }));
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_update_content_replaces_payload() {
        let mut doc = BlockDocument::new("c");
        let id = doc.add_block(BlockKind::Text, None).unwrap().id().clone();

        let content = BlockContent::Text(TextContent {
            title: "Definition".to_string(),
            body: "Basic technology refers to...".to_string(),
        });
        doc.update_content(&id, content.clone()).unwrap();

        assert_eq!(doc.get(&id).unwrap().content(), &content);
        assert_eq!(doc.get(&id).unwrap().order(), 0);
    }

    #[test]
    fn test_remove_missing_block_signals_not_found() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();

        let missing = BlockId::new("nope");
        assert_eq!(
            doc.remove_block(&missing).unwrap_err(),
            MutationError::NotFound(missing)
        );
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_insert_block_routes_through_reorder() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();
        doc.add_block(BlockKind::Text, None).unwrap();

        let id = doc.insert_block(BlockKind::Survey, None, 1).unwrap();
        assert_eq!(doc.index_of(&id), Some(1));
        assert!(doc.is_dense());
    }

    #[test]
    fn test_snapshot_with_gaps_is_redensified() {
        let mut doc = BlockDocument::new("c");
        let a = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
        let b = doc.add_block(BlockKind::Image, None).unwrap().id().clone();

        let mut snapshot = doc.snapshot();
        snapshot.blocks[0].order = 10;
        snapshot.blocks[1].order = 4;

        let loaded = BlockDocument::from_snapshot(snapshot).unwrap();
        assert_eq!(loaded.index_of(&b), Some(0));
        assert_eq!(loaded.index_of(&a), Some(1));
        assert!(loaded.is_dense());
    }

    #[test]
    fn test_snapshot_ids_are_not_reused() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();
        doc.add_block(BlockKind::Text, None).unwrap();

        let mut loaded = BlockDocument::from_snapshot(doc.snapshot()).unwrap();
        let id = loaded.add_block(BlockKind::Text, None).unwrap().id().clone();

        assert!(doc.get(&id).is_none());
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_ids() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();

        let mut snapshot = doc.snapshot();
        snapshot.blocks.push(snapshot.blocks[0].clone());

        assert!(matches!(
            BlockDocument::from_snapshot(snapshot),
            Err(MutationError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_snapshot_with_max_counter_id_still_accepts_blocks() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();
        doc.add_block(BlockKind::Text, None).unwrap();

        let seed = doc.ids.seed().to_string();
        let mut snapshot = doc.snapshot();
        let last = BlockId::new(format!("{}-{}", seed, u32::MAX));
        snapshot.blocks[0] = Block::new(last.clone(), 0, BlockKind::Text.default_content());
        let first = BlockId::new(format!("{}-1", seed));
        snapshot.blocks[1] = Block::new(first, 1, BlockKind::Text.default_content());

        let mut loaded = BlockDocument::from_snapshot(snapshot).unwrap();
        let id = loaded.add_block(BlockKind::Quiz, None).unwrap().id().clone();
        let next = loaded.add_block(BlockKind::Quiz, None).unwrap().id().clone();

        assert_eq!(id.as_str(), format!("{}-0", seed));
        assert_eq!(next.as_str(), format!("{}-2", seed));
        assert_eq!(loaded.len(), 4);
        assert!(loaded.is_dense());
    }

    #[test]
    fn test_snapshot_rejects_quiz_answer_out_of_range() {
        let mut doc = BlockDocument::new("c");
        doc.add_block(BlockKind::Text, None).unwrap();
        let quiz = doc.add_block(BlockKind::Quiz, None).unwrap().id().clone();

        let mut snapshot = doc.snapshot();
        snapshot.blocks[1] = Block::new(
            quiz,
            1,
            BlockContent::Quiz(QuizContent {
                question: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                correct: 2,
            }),
        );

        assert!(matches!(
            BlockDocument::from_snapshot(snapshot),
            Err(MutationError::InvalidContent(_))
        ));
    }
}
