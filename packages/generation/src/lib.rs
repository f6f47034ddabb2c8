//! # Coursecraft Generation
//!
//! Asynchronous, cancellable content generation for the course editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ WizardSession                │   │ TextTransformPipeline        │
//! │  step table, one active job  │   │  one in-flight transform     │
//! │  draft under review          │   │  one candidate               │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!                │                                  │
//!                ▼                                  ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ GenerationJob: phases, progress, Cancelled / Succeeded / Failed  │
//! └──────────────────────────────────────────────────────────────────┘
//!                │  JobChannel (tokio mpsc)
//!                ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ GenerationBackend / TransformBackend                             │
//! │  SimulatedBackend · LocalTransformBackend · ManualBackend        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Generated content reaches a [`coursecraft_editor::BlockDocument`] only
//! through an explicit accept or apply.

mod backend;
mod config;
mod draft;
mod errors;
mod job;
mod request;
mod simulated;
mod transform;
mod wizard;

pub use backend::{GenerationBackend, ManualBackend, TransformBackend};
pub use config::{DeliveryMethod, Difficulty, GenerationConfig, ImageStyle, QuestionType, Tone};
pub use draft::{CourseDraft, Draft, InteractionDraft, OutlineSection, QuizDraft, QuizQuestion};
pub use errors::{DraftError, JobError, TransformError, WizardError};
pub use job::{
    job_channel, GenerationJob, JobChannel, JobEvent, JobReporter, JobState, JobUpdate, Phase,
};
pub use request::{CreationMethod, GenerationRequest, InputFields, InteractionType, WizardKind};
pub use simulated::{build_draft, SimulatedBackend};
pub use transform::{
    transform_text, LocalTransformBackend, TextTransformPipeline, TransformAction,
    TransformRequest, TransformResult,
};
pub use wizard::{next_step, WizardAction, WizardSession, WizardStep, TRANSITIONS};
