//! # Edit Session Management
//!
//! An EditSession is one author's editing view of a course page: the
//! document, the selected block and the drag gesture in progress.
//!
//! Persistence goes through a [`CourseStore`]. Loading degrades to an empty
//! document when the store fails, and saving only ever happens on an
//! explicit [`EditSession::save`] call.

use crate::block::BlockId;
use crate::document::BlockDocument;
use crate::drag::{DragReorderController, DropIndicator};
use crate::mutations::{Mutation, MutationError, MutationOutcome, MutationResult};
use crate::store::CourseStore;
use crate::EditorError;

/// Result of an explicit save
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved { version: u64 },
    Failed(String),
    /// A previous save failed; saving stays off until `reset_save`
    Disabled,
}

/// Single edit session
#[derive(Debug)]
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: BlockDocument,

    selected_block: Option<BlockId>,

    drag: DragReorderController,

    save_enabled: bool,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: BlockDocument) -> Self {
        let selected_block = document.blocks().first().map(|b| b.id().clone());
        Self {
            id: id.into(),
            document,
            selected_block,
            drag: DragReorderController::new(),
            save_enabled: true,
        }
    }

    /// Load a course, surfacing store and snapshot errors
    pub fn try_open(
        id: impl Into<String>,
        store: &dyn CourseStore,
        course_id: &str,
    ) -> Result<Self, EditorError> {
        let snapshot = store.load_course(course_id)?;
        let document = BlockDocument::from_snapshot(snapshot)?;
        Ok(Self::new(id, document))
    }

    /// Load a course, starting from an empty document if that fails
    pub fn open(id: impl Into<String>, store: &dyn CourseStore, course_id: &str) -> Self {
        let id = id.into();
        match Self::try_open(id.clone(), store, course_id) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Could not load course {}, starting empty: {}", course_id, e);
                Self::new(id, BlockDocument::new(course_id))
            }
        }
    }

    pub fn document(&self) -> &BlockDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut BlockDocument {
        &mut self.document
    }

    /// Apply a mutation, keeping the selection pointed at a live block
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.document.apply(mutation)?;

        match &result.outcome {
            MutationOutcome::Added(id) => self.selected_block = Some(id.clone()),
            MutationOutcome::Removed(id) if self.selected_block.as_ref() == Some(id) => {
                self.selected_block = self.document.blocks().first().map(|b| b.id().clone());
            }
            _ => {}
        }

        Ok(result)
    }

    /// Update selection
    pub fn select(&mut self, block_id: &BlockId) -> Result<(), MutationError> {
        if self.document.get(block_id).is_none() {
            return Err(MutationError::NotFound(block_id.clone()));
        }
        self.selected_block = Some(block_id.clone());
        Ok(())
    }

    /// Selected block, if it still exists
    pub fn selected(&self) -> Option<&BlockId> {
        self.selected_block
            .as_ref()
            .filter(|id| self.document.get(id).is_some())
    }

    pub fn begin_drag(&mut self, block_id: &BlockId) -> Result<(), MutationError> {
        self.drag.begin(&self.document, block_id)
    }

    pub fn hover_drag(&self, block_id: &BlockId) -> Option<DropIndicator> {
        self.drag.hover(&self.document, block_id)
    }

    pub fn drop_on(&mut self, block_id: &BlockId) -> Result<MutationOutcome, MutationError> {
        self.drag.drop(&mut self.document, block_id)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Persist the current document
    pub fn save(&mut self, store: &dyn CourseStore) -> SaveStatus {
        if !self.save_enabled {
            return SaveStatus::Disabled;
        }

        match store.save_course(&self.document.snapshot()) {
            Ok(()) => {
                tracing::info!(
                    "Saved course {} at version {}",
                    self.document.course_id(),
                    self.document.version()
                );
                SaveStatus::Saved {
                    version: self.document.version(),
                }
            }
            Err(e) => {
                tracing::warn!("Save failed for course {}: {}", self.document.course_id(), e);
                self.save_enabled = false;
                SaveStatus::Failed(e.to_string())
            }
        }
    }

    pub fn can_save(&self) -> bool {
        self.save_enabled
    }

    /// Re-enable saving after a failure
    pub fn reset_save(&mut self) {
        self.save_enabled = true;
    }
}
