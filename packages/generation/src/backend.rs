//! Generation and transform backends
//!
//! A backend receives a request and returns the [`JobChannel`] it will
//! report on. Whether the work is a timer, a network call or a test
//! driving events by hand is invisible to the job that owns the channel.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::draft::Draft;
use crate::job::{job_channel, JobChannel, JobReporter};
use crate::request::GenerationRequest;
use crate::transform::TransformRequest;

/// Produces course, quiz and interaction drafts
pub trait GenerationBackend {
    fn run_generation(&self, request: &GenerationRequest) -> JobChannel<Draft>;
}

/// Produces candidate text for a transform action
pub trait TransformBackend {
    fn run_transform(&self, request: &TransformRequest) -> JobChannel<String>;
}

/// Backend whose jobs are driven by hand
///
/// Each run queues a [`JobReporter`]; tests take it and send exactly the
/// events they want, with no timing involved.
#[derive(Debug)]
pub struct ManualBackend<T> {
    reporters: Arc<Mutex<VecDeque<JobReporter<T>>>>,
}

impl<T> Clone for ManualBackend<T> {
    fn clone(&self) -> Self {
        Self {
            reporters: Arc::clone(&self.reporters),
        }
    }
}

impl<T> Default for ManualBackend<T> {
    fn default() -> Self {
        Self {
            reporters: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<T> ManualBackend<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest job not yet taken
    pub fn take_reporter(&self) -> Option<JobReporter<T>> {
        self.reporters.lock().ok()?.pop_front()
    }

    /// Jobs started but not yet taken
    pub fn pending(&self) -> usize {
        self.reporters.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn open(&self) -> JobChannel<T> {
        let (reporter, channel) = job_channel();
        if let Ok(mut reporters) = self.reporters.lock() {
            reporters.push_back(reporter);
        }
        channel
    }
}

impl GenerationBackend for ManualBackend<Draft> {
    fn run_generation(&self, request: &GenerationRequest) -> JobChannel<Draft> {
        tracing::debug!("manual generation job for {:?}", request.kind);
        self.open()
    }
}

impl TransformBackend for ManualBackend<String> {
    fn run_transform(&self, request: &TransformRequest) -> JobChannel<String> {
        tracing::debug!("manual transform job for {}", request.action);
        self.open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{GenerationJob, JobState};
    use crate::transform::TransformAction;

    #[test]
    fn test_manual_backend_hands_out_reporters() {
        let backend: ManualBackend<String> = ManualBackend::new();
        let request = TransformRequest::new(TransformAction::Shorten, "some text");

        let mut job = GenerationJob::new(["transform"]);
        job.start_with(backend.run_transform(&request)).unwrap();
        assert_eq!(backend.pending(), 1);

        let reporter = backend.take_reporter().unwrap();
        assert_eq!(backend.pending(), 0);

        reporter.succeed("short".to_string());
        job.poll();
        assert_eq!(job.state(), &JobState::Succeeded("short".to_string()));
    }
}
