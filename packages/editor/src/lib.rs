//! # Coursecraft Editor
//!
//! Block-based editing engine for course pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI events: edit · drag · drop · save        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - DragReorderController (source id only)   │
//! │  - Mutations with validation                │
//! │  - BlockDocument owns the dense order       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ CourseStore: load / save snapshots          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: ordering lives only in `BlockDocument`
//! 2. **Typed content**: a block's payload is a variant of its type
//! 3. **All-or-nothing**: rejected mutations change nothing
//! 4. **Explicit persistence**: saving happens only when asked
//!
//! ## Usage
//!
//! ```rust
//! use coursecraft_editor::{BlockDocument, BlockKind};
//!
//! let mut doc = BlockDocument::new("basic-technology");
//! let text = doc.add_block(BlockKind::Text, None)?.id().clone();
//! let quiz = doc.add_block(BlockKind::Quiz, None)?.id().clone();
//!
//! doc.reorder(&quiz, 0)?;
//! assert_eq!(doc.index_of(&text), Some(1));
//! # Ok::<(), coursecraft_editor::MutationError>(())
//! ```

mod block;
mod document;
mod drag;
mod errors;
mod mutations;
mod session;
mod store;

pub use block::{
    Block, BlockContent, BlockId, BlockKind, Flashcard, FlashcardsContent, ImageContent,
    MatchingContent, MatchingPair, PollContent, QuizContent, SurveyContent, TextContent,
    TimelineContent, TimelineEvent, VideoContent,
};
pub use document::{BlockDocument, DocumentSnapshot};
pub use drag::{DragReorderController, DropIndicator};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationOutcome, MutationResult};
pub use session::{EditSession, SaveStatus};
pub use store::{CourseStore, CourseSummary, FileCourseStore, MemoryCourseStore};
