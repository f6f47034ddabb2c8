//! # Generation Jobs
//!
//! A [`GenerationJob`] is the owner-side view of one asynchronous unit of
//! work. The backend doing the work only holds a [`JobReporter`] and talks
//! to the job through an unbounded channel:
//!
//! ```text
//! backend task ──JobEvent──▶ mpsc ──▶ GenerationJob::poll / next_update
//!      ▲                                       │
//!      └──────── closed + aborted ◀── cancel() ┘
//! ```
//!
//! Events are validated when the owner drains them, so a misbehaving
//! backend can never report phases out of order or move progress
//! backwards. Cancelling drops the receiving end and aborts the task:
//! once `cancel()` returns nothing the backend does is observable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::AbortHandle;

use crate::errors::JobError;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// One named sub-task of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub name: String,
    /// 0-100
    pub progress: u8,
}

impl Phase {
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobState<T> {
    Pending,
    Running,
    Cancelled,
    Succeeded(T),
    Failed(String),
}

impl<T> JobState<T> {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Cancelled | JobState::Succeeded(_) | JobState::Failed(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Cancelled => "cancelled",
            JobState::Succeeded(_) => "succeeded",
            JobState::Failed(_) => "failed",
        }
    }
}

/// Message from a backend to the job it works for
#[derive(Debug)]
pub enum JobEvent<T> {
    Progress { phase: usize, progress: u8 },
    Succeeded(T),
    Failed(String),
}

/// Observable change produced by draining backend events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobUpdate {
    Progress { phase: usize, name: String, progress: u8 },
    Succeeded,
    Failed(String),
}

/// Backend-side handle used to report on a job
#[derive(Debug)]
pub struct JobReporter<T> {
    tx: mpsc::UnboundedSender<JobEvent<T>>,
}

impl<T> Clone for JobReporter<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> JobReporter<T> {
    /// Report progress; returns `false` once the job is gone
    pub fn progress(&self, phase: usize, progress: u8) -> bool {
        self.tx.send(JobEvent::Progress { phase, progress }).is_ok()
    }

    pub fn succeed(&self, payload: T) -> bool {
        self.tx.send(JobEvent::Succeeded(payload)).is_ok()
    }

    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.tx.send(JobEvent::Failed(reason.into())).is_ok()
    }

    /// Whether the owner has cancelled or dropped the job
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves when the owner cancels or drops the job
    pub async fn cancelled(&self) {
        self.tx.closed().await
    }
}

/// Owner-side end of a backend's event stream
#[derive(Debug)]
pub struct JobChannel<T> {
    events: mpsc::UnboundedReceiver<JobEvent<T>>,
    task: Option<AbortHandle>,
}

impl<T> JobChannel<T> {
    /// Tie a spawned task to the channel so dropping it aborts the task
    pub fn with_task(mut self, task: AbortHandle) -> Self {
        self.task = Some(task);
        self
    }
}

impl<T> Drop for JobChannel<T> {
    fn drop(&mut self) {
        self.events.close();
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Create a connected reporter/channel pair
pub fn job_channel<T>() -> (JobReporter<T>, JobChannel<T>) {
    let (tx, events) = mpsc::unbounded_channel();
    (JobReporter { tx }, JobChannel { events, task: None })
}

/// Cancellable asynchronous unit of work with ordered progress phases
#[derive(Debug)]
pub struct GenerationJob<T> {
    id: u64,
    phases: Vec<Phase>,
    state: JobState<T>,
    channel: Option<JobChannel<T>>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl<T> GenerationJob<T> {
    /// Create a pending job with the given phases, in reporting order
    pub fn new<I, S>(phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed),
            phases: phases
                .into_iter()
                .map(|name| Phase {
                    name: name.into(),
                    progress: 0,
                })
                .collect(),
            state: JobState::Pending,
            channel: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn state(&self) -> &JobState<T> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, JobState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Mean progress over all phases
    pub fn overall_progress(&self) -> u8 {
        if self.phases.is_empty() {
            return if matches!(self.state, JobState::Succeeded(_)) { 100 } else { 0 };
        }
        let total: u32 = self.phases.iter().map(|p| p.progress as u32).sum();
        (total / self.phases.len() as u32) as u8
    }

    /// Phase currently being worked on
    pub fn current_phase(&self) -> Option<&Phase> {
        self.phases.iter().find(|p| !p.is_complete())
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.state {
            JobState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self.state {
            JobState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Pending → Running
    pub fn start(&mut self) -> Result<(), JobError> {
        if !matches!(self.state, JobState::Pending) {
            return Err(JobError::NotPending(self.state.name()));
        }
        self.state = JobState::Running;
        self.started_at = Some(Utc::now());
        tracing::debug!("job {} started with {} phases", self.id, self.phases.len());
        Ok(())
    }

    /// Start the job and listen to a backend's event stream
    pub fn start_with(&mut self, channel: JobChannel<T>) -> Result<(), JobError> {
        self.start()?;
        self.channel = Some(channel);
        Ok(())
    }

    /// Record progress for `phase`
    ///
    /// Returns `Ok(false)` when the value is already recorded. Every earlier
    /// phase must be at 100 and progress never goes back.
    pub fn report_progress(&mut self, phase: usize, progress: u8) -> Result<bool, JobError> {
        self.ensure_running()?;
        if phase >= self.phases.len() {
            return Err(JobError::UnknownPhase(phase));
        }
        if let Some(incomplete) = self.phases[..phase].iter().position(|p| !p.is_complete()) {
            return Err(JobError::PhaseOutOfOrder { phase, incomplete });
        }

        let progress = progress.min(100);
        let current = self.phases[phase].progress;
        if progress < current {
            return Err(JobError::ProgressRegressed {
                phase,
                from: current,
                to: progress,
            });
        }
        if progress == current {
            return Ok(false);
        }

        self.phases[phase].progress = progress;
        tracing::debug!(
            "job {} phase {} ({}) at {}%",
            self.id,
            phase,
            self.phases[phase].name,
            progress
        );
        Ok(true)
    }

    /// Terminal success; every phase is marked complete
    pub fn succeed(&mut self, payload: T) -> Result<(), JobError> {
        self.ensure_running()?;
        for phase in &mut self.phases {
            phase.progress = 100;
        }
        self.finish(JobState::Succeeded(payload));
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), JobError> {
        self.ensure_running()?;
        self.finish(JobState::Failed(reason.into()));
        Ok(())
    }

    /// Cancel a running job
    ///
    /// Returns `false` and changes nothing when the job is not running.
    /// After this returns no event from the backend is applied.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.finish(JobState::Cancelled);
        true
    }

    /// Apply every event the backend has sent so far
    pub fn poll(&mut self) -> Vec<JobUpdate> {
        let mut updates = Vec::new();
        while self.is_running() {
            let Some(channel) = self.channel.as_mut() else {
                break;
            };
            match channel.events.try_recv() {
                Ok(event) => updates.extend(self.apply_event(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => updates.push(self.backend_vanished()),
            }
        }
        updates
    }

    /// Wait for the next observable change
    ///
    /// Returns `None` once the job is no longer running.
    pub async fn next_update(&mut self) -> Option<JobUpdate> {
        while self.is_running() {
            let channel = self.channel.as_mut()?;
            let event = channel.events.recv().await;
            let update = match event {
                Some(event) => self.apply_event(event),
                None => Some(self.backend_vanished()),
            };
            if update.is_some() {
                return update;
            }
        }
        None
    }

    /// Drive the job to a terminal state
    pub async fn wait(&mut self) -> &JobState<T> {
        while self.next_update().await.is_some() {}
        &self.state
    }

    fn apply_event(&mut self, event: JobEvent<T>) -> Option<JobUpdate> {
        let applied = match event {
            JobEvent::Progress { phase, progress } => {
                match self.report_progress(phase, progress) {
                    Ok(true) => Ok(Some(JobUpdate::Progress {
                        phase,
                        name: self.phases[phase].name.clone(),
                        progress: self.phases[phase].progress,
                    })),
                    Ok(false) => Ok(None),
                    Err(e) => Err(e),
                }
            }
            JobEvent::Succeeded(payload) => self
                .succeed(payload)
                .map(|_| Some(JobUpdate::Succeeded)),
            JobEvent::Failed(reason) => self
                .fail(reason.clone())
                .map(|_| Some(JobUpdate::Failed(reason))),
        };

        applied.unwrap_or_else(|e| {
            tracing::warn!("job {}: ignoring backend event: {}", self.id, e);
            None
        })
    }

    fn backend_vanished(&mut self) -> JobUpdate {
        let reason = "backend stopped without a result".to_string();
        self.finish(JobState::Failed(reason.clone()));
        JobUpdate::Failed(reason)
    }

    fn ensure_running(&self) -> Result<(), JobError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(JobError::NotRunning(self.state.name()))
        }
    }

    fn finish(&mut self, state: JobState<T>) {
        tracing::info!("job {} {}", self.id, state.name());
        self.state = state;
        self.finished_at = Some(Utc::now());
        self.channel = None;
    }
}
