//! # Drag Reordering
//!
//! Turns a pointer drag gesture into a single [`BlockDocument::reorder`]
//! call. The controller only remembers which block is being dragged; the
//! document stays the sole source of truth for ordering.
//!
//! ```text
//! begin(a) → hover(b)* → drop(b)   ⇒ doc.reorder(a, index_of(b))
//!          └──────────→ cancel()   ⇒ no mutation
//! ```

use crate::block::BlockId;
use crate::document::BlockDocument;
use crate::mutations::{MutationError, MutationOutcome};

/// Where a drop on the hovered block would land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndicator {
    pub target_id: BlockId,
    pub target_index: usize,
}

#[derive(Debug, Default)]
pub struct DragReorderController {
    source: Option<BlockId>,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `block_id` as the drag source
    pub fn begin(&mut self, doc: &BlockDocument, block_id: &BlockId) -> Result<(), MutationError> {
        if doc.get(block_id).is_none() {
            return Err(MutationError::NotFound(block_id.clone()));
        }
        self.source = Some(block_id.clone());
        Ok(())
    }

    /// Currently dragged block
    pub fn source(&self) -> Option<&BlockId> {
        self.source.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    /// Preview a drop on `block_id` without mutating anything
    ///
    /// Returns `None` when nothing is being dragged, when hovering the
    /// source itself, or when the target is not in the document.
    pub fn hover(&self, doc: &BlockDocument, block_id: &BlockId) -> Option<DropIndicator> {
        let source = self.source.as_ref()?;
        if source == block_id {
            return None;
        }
        doc.index_of(block_id).map(|target_index| DropIndicator {
            target_id: block_id.clone(),
            target_index,
        })
    }

    /// Commit the drag onto `target_id`
    ///
    /// The drag ends whatever the result. Dropping without an active drag,
    /// or onto the source itself, changes nothing.
    pub fn drop(
        &mut self,
        doc: &mut BlockDocument,
        target_id: &BlockId,
    ) -> Result<MutationOutcome, MutationError> {
        let Some(source) = self.source.take() else {
            return Ok(MutationOutcome::Unchanged);
        };
        if &source == target_id {
            return Ok(MutationOutcome::Unchanged);
        }

        let target_index = doc
            .index_of(target_id)
            .ok_or_else(|| MutationError::NotFound(target_id.clone()))?;

        doc.reorder(&source, target_index)
    }

    /// Abort the drag
    pub fn cancel(&mut self) {
        self.source = None;
    }
}
