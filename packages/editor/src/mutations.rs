//! # Document Mutations
//!
//! High-level semantic operations on a block document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one editor action
//! 2. **Validated**: All mutations are checked before anything changes
//! 3. **All-or-nothing**: A rejected mutation leaves the document untouched
//! 4. **Dense order**: After every mutation block orders are exactly `0..N`
//!
//! ## Mutation Semantics
//!
//! ### Reorder
//! - Remove from the current position, reinsert at the clamped target
//! - Every block's order is reassigned to its new position
//! - Same index is a no-op
//!
//! ### RemoveBlock
//! - Closes the gap: later blocks shift down by one
//!
//! ### UpdateContent
//! - Atomic replacement of the payload, never changes the block type

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{BlockContent, BlockId, BlockKind};
use crate::document::BlockDocument;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Mutation {
    /// Append a block, with default content when none is given
    AddBlock {
        kind: BlockKind,
        content: Option<BlockContent>,
    },

    /// Append a block, then move it to `index`
    InsertBlock {
        kind: BlockKind,
        content: Option<BlockContent>,
        index: usize,
    },

    RemoveBlock {
        block_id: BlockId,
    },

    /// Replace a block's payload (atomic, same type only)
    UpdateContent {
        block_id: BlockId,
        content: BlockContent,
    },

    /// Move a block to `target_index` in display order
    Reorder {
        block_id: BlockId,
        target_index: usize,
    },

    SetTitle {
        title: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("Block {block_id} is {expected}, got {found} content")]
    TypeMismatch {
        block_id: BlockId,
        expected: BlockKind,
        found: BlockKind,
    },

    #[error("Block not found: {0}")]
    NotFound(BlockId),

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

impl Mutation {
    /// Validate without applying
    pub fn validate(&self, doc: &BlockDocument) -> Result<(), MutationError> {
        match self {
            Mutation::AddBlock { kind, content } | Mutation::InsertBlock { kind, content, .. } => {
                match content {
                    Some(content) => check_content(None, *kind, content),
                    None => Ok(()),
                }
            }

            Mutation::RemoveBlock { block_id } | Mutation::Reorder { block_id, .. } => {
                doc.get(block_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::NotFound(block_id.clone()))
            }

            Mutation::UpdateContent { block_id, content } => {
                let block = doc
                    .get(block_id)
                    .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;
                check_content(Some(block_id), block.kind(), content)
            }

            Mutation::SetTitle { .. } => Ok(()),
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add-block",
            Mutation::InsertBlock { .. } => "insert-block",
            Mutation::RemoveBlock { .. } => "remove-block",
            Mutation::UpdateContent { .. } => "update-content",
            Mutation::Reorder { .. } => "reorder",
            Mutation::SetTitle { .. } => "set-title",
        }
    }
}

/// Check a payload against the type it is meant for
pub(crate) fn check_content(
    block_id: Option<&BlockId>,
    expected: BlockKind,
    content: &BlockContent,
) -> Result<(), MutationError> {
    let found = content.kind();
    if found != expected {
        return Err(MutationError::TypeMismatch {
            block_id: block_id.cloned().unwrap_or_else(|| BlockId::new("<new>")),
            expected,
            found,
        });
    }
    content.validate()
}

/// What an applied mutation did
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Added(BlockId),
    Removed(BlockId),
    Updated(BlockId),
    Moved { block_id: BlockId, from: usize, to: usize },
    TitleChanged,
    /// Valid but had no effect (e.g. reorder onto the current index)
    Unchanged,
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    pub outcome: MutationOutcome,
}
