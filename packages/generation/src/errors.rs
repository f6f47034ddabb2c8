//! Error types for generation jobs, wizards and text transforms

use coursecraft_editor::{BlockId, BlockKind, MutationError};
use thiserror::Error;

use crate::wizard::{WizardAction, WizardStep};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    #[error("Job is {0}, expected pending")]
    NotPending(&'static str),

    #[error("Job is {0}, expected running")]
    NotRunning(&'static str),

    #[error("Unknown phase index: {0}")]
    UnknownPhase(usize),

    #[error("Phase {phase} reported before phase {incomplete} completed")]
    PhaseOutOfOrder { phase: usize, incomplete: usize },

    #[error("Progress of phase {phase} went back from {from} to {to}")]
    ProgressRegressed { phase: usize, from: u8, to: u8 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("Section not found: {0}")]
    SectionNotFound(u32),

    #[error("Section {section} has no page {index}")]
    PageOutOfRange { section: u32, index: usize },

    #[error("No suggested title at {0}")]
    TitleOutOfRange(usize),

    #[error("No question at {0}")]
    QuestionOutOfRange(usize),

    #[error("Draft is not a {0} draft")]
    WrongDraft(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("Cannot {action:?} from {from:?}")]
    InvalidTransition { from: WizardStep, action: WizardAction },

    #[error("Method {method} is not available for the {kind} wizard")]
    InvalidMethod { kind: String, method: String },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("No generation in progress")]
    NoActiveJob,

    #[error("Nothing to accept")]
    NoResult,

    #[error("Wizard is closed")]
    Closed,

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Nothing to transform: input is empty")]
    EmptyInput,

    #[error("Block {block_id} ({kind}) has no text to replace")]
    NoTextSlot { block_id: BlockId, kind: BlockKind },

    #[error("Transform failed: {0}")]
    Failed(String),

    #[error("No transform in progress")]
    NotRequested,

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}
