//! # Generation Wizard
//!
//! A [`WizardSession`] walks an author from picking a creation method to
//! reviewing a generated draft. Steps are a closed enum and every move
//! goes through [`TRANSITIONS`]; anything not listed there is rejected.
//!
//! ```text
//! MethodSelect ─choose─▶ Input ─submit─▶ Configure ─start─▶ Generating ─complete─▶ Review
//!       ◀──────back────────┘  ◀───back────┘ ◀──back─────────┘                       │
//!                                         ◀──────────── back / regenerate ───────────┘
//! ```
//!
//! Leaving `Generating` for any step cancels the running job first. The
//! draft shown in `Review` is the session's own copy: no document changes
//! until [`WizardSession::accept`].

use serde::{Deserialize, Serialize};

use coursecraft_editor::{BlockDocument, BlockId};

use crate::backend::GenerationBackend;
use crate::config::GenerationConfig;
use crate::draft::Draft;
use crate::errors::WizardError;
use crate::job::{GenerationJob, JobState, JobUpdate};
use crate::request::{CreationMethod, GenerationRequest, InputFields, WizardKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    MethodSelect,
    Input,
    Configure,
    Generating,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardAction {
    Choose,
    Submit,
    StartGeneration,
    Complete,
    Regenerate,
    Back,
    Accept,
}

/// Every legal move: (from, action, to)
pub const TRANSITIONS: &[(WizardStep, WizardAction, WizardStep)] = &[
    (WizardStep::MethodSelect, WizardAction::Choose, WizardStep::Input),
    (WizardStep::Input, WizardAction::Submit, WizardStep::Configure),
    (WizardStep::Configure, WizardAction::StartGeneration, WizardStep::Generating),
    (WizardStep::Generating, WizardAction::Complete, WizardStep::Review),
    (WizardStep::Review, WizardAction::Regenerate, WizardStep::Configure),
    (WizardStep::Input, WizardAction::Back, WizardStep::MethodSelect),
    (WizardStep::Configure, WizardAction::Back, WizardStep::Input),
    (WizardStep::Generating, WizardAction::Back, WizardStep::Configure),
    (WizardStep::Review, WizardAction::Back, WizardStep::Configure),
];

/// Look up the step `action` leads to from `from`
pub fn next_step(from: WizardStep, action: WizardAction) -> Option<WizardStep> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
}

pub struct WizardSession {
    kind: WizardKind,
    step: WizardStep,
    method: Option<CreationMethod>,
    input: InputFields,
    config: GenerationConfig,
    active_job: Option<GenerationJob<Draft>>,
    last_cancelled: Option<GenerationJob<Draft>>,
    result: Option<Draft>,
    failure: Option<String>,
    backend: Box<dyn GenerationBackend>,
    closed: bool,
}

impl WizardSession {
    pub fn new(kind: WizardKind, backend: impl GenerationBackend + 'static) -> Self {
        Self {
            kind,
            step: WizardStep::MethodSelect,
            method: None,
            input: InputFields::default(),
            config: GenerationConfig::for_kind(kind),
            active_job: None,
            last_cancelled: None,
            result: None,
            failure: None,
            backend: Box::new(backend),
            closed: false,
        }
    }

    pub fn kind(&self) -> WizardKind {
        self.kind
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn method(&self) -> Option<&CreationMethod> {
        self.method.as_ref()
    }

    pub fn input(&self) -> &InputFields {
        &self.input
    }

    /// Config of the last generation, or the wizard's defaults
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn active_job(&self) -> Option<&GenerationJob<Draft>> {
        self.active_job.as_ref()
    }

    /// Most recent job cancelled by navigating away
    pub fn last_cancelled(&self) -> Option<&GenerationJob<Draft>> {
        self.last_cancelled.as_ref()
    }

    /// Draft under review
    pub fn result(&self) -> Option<&Draft> {
        self.result.as_ref()
    }

    /// Draft under review, for editing before acceptance
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.result.as_mut()
    }

    /// Reason the last generation failed, while still in `Generating`
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// MethodSelect → Input
    pub fn choose(&mut self, method: CreationMethod) -> Result<WizardStep, WizardError> {
        let next = self.check(WizardAction::Choose)?;
        if !method.allowed_for(self.kind) {
            return Err(WizardError::InvalidMethod {
                kind: self.kind.to_string(),
                method: method.name().to_string(),
            });
        }
        method.validate()?;

        self.method = Some(method);
        self.enter(next);
        Ok(next)
    }

    /// Input → Configure
    pub fn submit(&mut self, fields: InputFields) -> Result<WizardStep, WizardError> {
        let next = self.check(WizardAction::Submit)?;
        let method = self.method.as_ref().ok_or(WizardError::InvalidTransition {
            from: self.step,
            action: WizardAction::Submit,
        })?;
        fields.validate(method)?;

        self.input = fields;
        self.enter(next);
        Ok(next)
    }

    /// Configure → Generating, starting exactly one job
    pub fn start_generation(
        &mut self,
        config: GenerationConfig,
    ) -> Result<&GenerationJob<Draft>, WizardError> {
        let next = self.check(WizardAction::StartGeneration)?;
        config.validate(self.kind)?;
        let method = self.method.clone().ok_or(WizardError::InvalidTransition {
            from: self.step,
            action: WizardAction::StartGeneration,
        })?;

        let request = GenerationRequest {
            kind: self.kind,
            method,
            input: self.input.clone(),
            config: config.clone(),
        };
        let mut job = GenerationJob::new(request.phases());
        job.start_with(self.backend.run_generation(&request))?;

        self.config = config;
        self.result = None;
        self.failure = None;
        self.enter(next);
        tracing::info!("{} wizard started job {}", self.kind, job.id());

        Ok(self.active_job.insert(job))
    }

    /// Apply what the backend has reported so far
    ///
    /// Moves to `Review` once the job succeeds. A failure leaves the wizard
    /// in `Generating` with [`failure`](Self::failure) set.
    pub fn poll(&mut self) -> Vec<JobUpdate> {
        let updates = match self.active_job.as_mut() {
            Some(job) if self.step == WizardStep::Generating => job.poll(),
            _ => return Vec::new(),
        };
        self.settle();
        updates
    }

    /// Wait for the running job and return the draft to review
    pub async fn wait(&mut self) -> Result<&Draft, WizardError> {
        if self.closed {
            return Err(WizardError::Closed);
        }
        if let Some(job) = self.active_job.as_mut() {
            job.wait().await;
            self.settle();
        }

        if let Some(reason) = &self.failure {
            return Err(WizardError::GenerationFailed(reason.clone()));
        }
        match (self.step, self.result.as_ref()) {
            (WizardStep::Review, Some(draft)) => Ok(draft),
            _ => Err(WizardError::NoActiveJob),
        }
    }

    /// Step back, cancelling a running job when leaving `Generating`
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.check(WizardAction::Back)?;

        match self.step {
            WizardStep::Input => self.method = None,
            WizardStep::Review => self.result = None,
            _ => {}
        }
        self.failure = None;
        self.enter(next);
        Ok(next)
    }

    /// Review → Configure, discarding the draft
    pub fn request_regenerate(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.check(WizardAction::Regenerate)?;
        self.result = None;
        self.enter(next);
        Ok(next)
    }

    /// Turn the reviewed draft into blocks of `doc` and close the wizard
    ///
    /// Nothing is added unless every block is accepted.
    pub fn accept(&mut self, doc: &mut BlockDocument) -> Result<Vec<BlockId>, WizardError> {
        if self.closed {
            return Err(WizardError::Closed);
        }
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                action: WizardAction::Accept,
            });
        }
        let draft = self.result.as_ref().ok_or(WizardError::NoResult)?;
        let added = draft.materialize(doc)?;

        tracing::info!("{} wizard accepted {} blocks", self.kind, added.len());
        self.result = None;
        self.closed = true;
        Ok(added)
    }

    /// Close the wizard, cancelling any job and dropping the draft
    pub fn abandon(&mut self) {
        self.cancel_active_job();
        self.result = None;
        self.failure = None;
        self.closed = true;
        tracing::info!("{} wizard abandoned at {:?}", self.kind, self.step);
    }

    fn check(&self, action: WizardAction) -> Result<WizardStep, WizardError> {
        if self.closed {
            return Err(WizardError::Closed);
        }
        next_step(self.step, action).ok_or(WizardError::InvalidTransition {
            from: self.step,
            action,
        })
    }

    fn enter(&mut self, next: WizardStep) {
        if next != WizardStep::Generating {
            self.cancel_active_job();
        }
        tracing::info!("{} wizard: {:?} -> {:?}", self.kind, self.step, next);
        self.step = next;
    }

    fn cancel_active_job(&mut self) {
        if let Some(mut job) = self.active_job.take() {
            if job.cancel() {
                tracing::info!("cancelled generation job {}", job.id());
                self.last_cancelled = Some(job);
            }
        }
    }

    fn settle(&mut self) {
        let failure = match self.active_job.as_ref().map(|job| job.state()) {
            Some(JobState::Succeeded(_)) => None,
            Some(JobState::Failed(reason)) => Some(reason.clone()),
            _ => return,
        };

        match failure {
            None => {
                self.result = self.active_job.take().and_then(GenerationJob::into_payload);
                if let Some(next) = next_step(self.step, WizardAction::Complete) {
                    self.enter(next);
                }
            }
            Some(reason) => {
                tracing::warn!("{} wizard generation failed: {}", self.kind, reason);
                self.failure = Some(reason);
                self.active_job = None;
            }
        }
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.cancel_active_job();
    }
}
