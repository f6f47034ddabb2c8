//! # Text Transforms
//!
//! [`TextTransformPipeline`] turns a piece of block text into a candidate
//! revision. The candidate lives only in the pipeline until it is applied
//! to a block or discarded:
//!
//! ```text
//! request ──▶ in flight ──▶ candidate ──apply──▶ BlockDocument::update_content
//!    │                          └──discard──▶ (gone)
//!    └── a new request cancels the one in flight
//! ```

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use coursecraft_editor::{BlockDocument, BlockId, MutationError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::backend::TransformBackend;
use crate::config::Tone;
use crate::errors::TransformError;
use crate::job::{job_channel, GenerationJob, JobChannel, JobState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformAction {
    Improve,
    Shorten,
    Lengthen,
    Simplify,
    Summarize,
    Complete,
    Paraphrase,
    AdjustTone,
    FixGrammar,
    Translate,
}

impl TransformAction {
    pub const ALL: [TransformAction; 10] = [
        TransformAction::Improve,
        TransformAction::Shorten,
        TransformAction::Lengthen,
        TransformAction::Simplify,
        TransformAction::Summarize,
        TransformAction::Complete,
        TransformAction::Paraphrase,
        TransformAction::AdjustTone,
        TransformAction::FixGrammar,
        TransformAction::Translate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformAction::Improve => "improve",
            TransformAction::Shorten => "shorten",
            TransformAction::Lengthen => "lengthen",
            TransformAction::Simplify => "simplify",
            TransformAction::Summarize => "summarize",
            TransformAction::Complete => "complete",
            TransformAction::Paraphrase => "paraphrase",
            TransformAction::AdjustTone => "adjust-tone",
            TransformAction::FixGrammar => "fix-grammar",
            TransformAction::Translate => "translate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransformAction::Improve => "Improve text",
            TransformAction::Shorten => "Make shorter",
            TransformAction::Lengthen => "Make longer",
            TransformAction::Simplify => "Simplify",
            TransformAction::Summarize => "Summarize",
            TransformAction::Complete => "Continue writing",
            TransformAction::Paraphrase => "Paraphrase",
            TransformAction::AdjustTone => "Adjust tone",
            TransformAction::FixGrammar => "Fix grammar",
            TransformAction::Translate => "Translate",
        }
    }
}

impl std::fmt::Display for TransformAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "tone" | "tone-adjust" => TransformAction::AdjustTone,
            "grammar" => TransformAction::FixGrammar,
            "expand" => TransformAction::Lengthen,
            _ => {
                return TransformAction::ALL
                    .into_iter()
                    .find(|a| a.as_str() == s)
                    .ok_or_else(|| format!("unknown transform action: {}", s))
            }
        };
        Ok(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub action: TransformAction,
    pub input: String,
    /// Used by adjust-tone
    pub tone: Tone,
    /// Used by translate
    pub language: String,
}

impl TransformRequest {
    pub fn new(action: TransformAction, input: impl Into<String>) -> Self {
        Self {
            action,
            input: input.into(),
            tone: Tone::default(),
            language: "English".to_string(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Candidate revision awaiting apply or discard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub action: TransformAction,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

fn long_words() -> Option<&'static Regex> {
    static LONG_WORDS: OnceLock<Option<Regex>> = OnceLock::new();
    LONG_WORDS
        .get_or_init(|| Regex::new(r"\b\w{8,}\b").ok())
        .as_ref()
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

/// Local rendition of every action
pub fn transform_text(request: &TransformRequest) -> String {
    let input = request.input.as_str();

    match request.action {
        TransformAction::Improve => {
            format!("Improved version: {} [with better clarity and structure]", input)
        }
        TransformAction::Shorten => {
            let keep = input.chars().count() * 7 / 10;
            format!("Concise version: {}...", prefix(input, keep))
        }
        TransformAction::Lengthen => format!(
            "Expanded version: {} [with additional examples and detailed context]",
            input
        ),
        TransformAction::Simplify => {
            let simplified = match long_words() {
                Some(re) => re.replace_all(input, "simple term").into_owned(),
                None => input.to_string(),
            };
            format!("Simplified version: {}", simplified)
        }
        TransformAction::Summarize => format!(
            "Summary: the key points are... [based on: {}...]",
            prefix(input, 50)
        ),
        TransformAction::Complete => {
            format!("{} [continuation generated with relevant context]", input)
        }
        TransformAction::Paraphrase => format!("Rephrased: [alternative version of: {}]", input),
        TransformAction::AdjustTone => format!(
            "Adjusted tone ({}): {} [adapted for the target audience]",
            request.tone, input
        ),
        TransformAction::FixGrammar => {
            format!("Corrected: {} [with grammar and spelling fixed]", input)
        }
        TransformAction::Translate => format!("Translation ({}): {}", request.language, input),
    }
}

/// Backend that computes transforms in-process
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransformBackend;

impl TransformBackend for LocalTransformBackend {
    fn run_transform(&self, request: &TransformRequest) -> JobChannel<String> {
        let (reporter, channel) = job_channel();
        reporter.progress(0, 100);
        reporter.succeed(transform_text(request));
        channel
    }
}

struct InFlight {
    action: TransformAction,
    job: GenerationJob<String>,
}

/// Holds at most one transform in flight and at most one candidate
pub struct TextTransformPipeline {
    backend: Box<dyn TransformBackend>,
    in_flight: Option<InFlight>,
    candidate: Option<TransformResult>,
    last_error: Option<String>,
}

impl Default for TextTransformPipeline {
    fn default() -> Self {
        Self::new(LocalTransformBackend)
    }
}

impl TextTransformPipeline {
    pub fn new(backend: impl TransformBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            in_flight: None,
            candidate: None,
            last_error: None,
        }
    }

    /// Start transforming `input`, cancelling any transform in flight
    pub fn request(&mut self, action: TransformAction, input: &str) -> Result<(), TransformError> {
        self.request_with(TransformRequest::new(action, input))
    }

    pub fn request_with(&mut self, request: TransformRequest) -> Result<(), TransformError> {
        if request.input.trim().is_empty() {
            return Err(TransformError::EmptyInput);
        }

        self.cancel();
        self.candidate = None;
        self.last_error = None;

        let mut job = GenerationJob::new(["transform"]);
        job.start_with(self.backend.run_transform(&request))?;
        tracing::debug!("transform {} requested as job {}", request.action, job.id());

        self.in_flight = Some(InFlight {
            action: request.action,
            job,
        });
        self.poll();
        Ok(())
    }

    /// Collect a finished transform, returning the candidate if there is one
    pub fn poll(&mut self) -> Option<&TransformResult> {
        if let Some(in_flight) = self.in_flight.as_mut() {
            in_flight.job.poll();
            self.settle();
        }
        self.candidate.as_ref()
    }

    /// Wait for the transform in flight
    pub async fn wait(&mut self) -> Result<&TransformResult, TransformError> {
        if let Some(in_flight) = self.in_flight.as_mut() {
            in_flight.job.wait().await;
            self.settle();
        }

        if let Some(reason) = &self.last_error {
            return Err(TransformError::Failed(reason.clone()));
        }
        self.candidate.as_ref().ok_or(TransformError::NotRequested)
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn candidate(&self) -> Option<&TransformResult> {
        self.candidate.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Write the candidate into the block's text
    ///
    /// Returns `Ok(false)` when there is no candidate. On error the
    /// candidate is kept so the caller can pick another block.
    pub fn apply(
        &mut self,
        doc: &mut BlockDocument,
        block_id: &BlockId,
    ) -> Result<bool, TransformError> {
        let Some(candidate) = &self.candidate else {
            return Ok(false);
        };

        let block = doc
            .get(block_id)
            .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;
        let content = block
            .content()
            .with_primary_text(&candidate.text)
            .ok_or_else(|| TransformError::NoTextSlot {
                block_id: block_id.clone(),
                kind: block.kind(),
            })?;

        doc.update_content(block_id, content)?;
        tracing::info!("applied {} candidate to block {}", candidate.action, block_id);
        self.candidate = None;
        Ok(true)
    }

    /// Drop the candidate without touching any block
    pub fn discard(&mut self) {
        self.candidate = None;
    }

    /// Candidate text, for the clipboard
    pub fn copy(&self) -> Option<String> {
        self.candidate.as_ref().map(|c| c.text.clone())
    }

    /// Cancel the transform in flight, if any
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(mut in_flight) => in_flight.job.cancel(),
            None => false,
        }
    }

    fn settle(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .map(|f| f.job.is_terminal())
            .unwrap_or(false);
        if !finished {
            return;
        }
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        let action = in_flight.action;
        if let JobState::Failed(reason) = in_flight.job.state() {
            tracing::warn!("transform {} failed: {}", action, reason);
            self.last_error = Some(reason.clone());
            return;
        }
        if let Some(text) = in_flight.job.into_payload() {
            self.candidate = Some(TransformResult {
                action,
                text,
                created_at: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ManualBackend;
    use coursecraft_editor::{BlockContent, BlockKind, TextContent};

    fn doc_with_text(body: &str) -> (BlockDocument, BlockId) {
        let mut doc = BlockDocument::new("course");
        let content = BlockContent::Text(TextContent {
            title: "Intro".to_string(),
            body: body.to_string(),
        });
        let id = doc.add_block(BlockKind::Text, Some(content)).unwrap().id().clone();
        (doc, id)
    }

    #[test]
    fn test_action_names_and_aliases() {
        for action in TransformAction::ALL {
            assert_eq!(action.as_str().parse::<TransformAction>(), Ok(action));
        }
        assert_eq!("tone".parse(), Ok(TransformAction::AdjustTone));
        assert_eq!("tone-adjust".parse(), Ok(TransformAction::AdjustTone));
        assert_eq!("grammar".parse(), Ok(TransformAction::FixGrammar));
        assert_eq!("expand".parse(), Ok(TransformAction::Lengthen));
        assert!("rewrite".parse::<TransformAction>().is_err());
    }

    #[test]
    fn test_local_transforms() {
        let shorten = TransformRequest::new(TransformAction::Shorten, "abcdefghij");
        assert_eq!(transform_text(&shorten), "Concise version: abcdefg...");

        let simplify = TransformRequest::new(TransformAction::Simplify, "An extraordinary idea");
        assert_eq!(transform_text(&simplify), "Simplified version: An simple term idea");

        let summarize = TransformRequest::new(TransformAction::Summarize, "x".repeat(80));
        assert!(transform_text(&summarize).contains(&format!("{}...", "x".repeat(50))));

        let translate =
            TransformRequest::new(TransformAction::Translate, "Hello").with_language("Portuguese");
        assert_eq!(transform_text(&translate), "Translation (Portuguese): Hello");

        let tone =
            TransformRequest::new(TransformAction::AdjustTone, "Hi").with_tone(Tone::Friendly);
        assert!(transform_text(&tone).starts_with("Adjusted tone (friendly)"));
    }

    #[test]
    fn test_blank_input_rejected() {
        let mut pipeline = TextTransformPipeline::default();

        assert_eq!(
            pipeline.request(TransformAction::Improve, "   \n"),
            Err(TransformError::EmptyInput)
        );
        assert!(!pipeline.is_processing());
    }

    #[test]
    fn test_apply_writes_candidate_once() {
        let (mut doc, id) = doc_with_text("Networks connect computers");
        let mut pipeline = TextTransformPipeline::default();

        pipeline.request(TransformAction::FixGrammar, "Networks connect computers").unwrap();
        let text = pipeline.copy().unwrap();
        assert_eq!(pipeline.candidate().map(|c| c.text.clone()), Some(text.clone()));

        assert_eq!(pipeline.apply(&mut doc, &id), Ok(true));
        assert_eq!(doc.get(&id).unwrap().content().primary_text(), Some(text.as_str()));

        let version = doc.version();
        assert_eq!(pipeline.apply(&mut doc, &id), Ok(false));
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_discard_leaves_block_untouched() {
        let (mut doc, id) = doc_with_text("Original");
        let before = doc.snapshot();
        let mut pipeline = TextTransformPipeline::default();

        pipeline.request(TransformAction::Paraphrase, "Original").unwrap();
        pipeline.discard();
        pipeline.discard();

        assert!(pipeline.candidate().is_none());
        assert_eq!(pipeline.apply(&mut doc, &id), Ok(false));
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_block_without_text_keeps_candidate() {
        let mut doc = BlockDocument::new("course");
        let flashcards = doc.add_block(BlockKind::Flashcards, None).unwrap().id().clone();
        let mut pipeline = TextTransformPipeline::default();

        pipeline.request(TransformAction::Improve, "Front side").unwrap();
        assert!(matches!(
            pipeline.apply(&mut doc, &flashcards),
            Err(TransformError::NoTextSlot { kind: BlockKind::Flashcards, .. })
        ));
        assert!(pipeline.candidate().is_some());
    }

    #[test]
    fn test_new_request_cancels_previous() {
        let backend: ManualBackend<String> = ManualBackend::new();
        let mut pipeline = TextTransformPipeline::new(backend.clone());

        pipeline.request(TransformAction::Shorten, "first").unwrap();
        let first = backend.take_reporter().unwrap();

        pipeline.request(TransformAction::Lengthen, "second").unwrap();
        let second = backend.take_reporter().unwrap();

        assert!(first.is_cancelled());
        assert!(!first.succeed("stale".to_string()));

        second.succeed("fresh".to_string());
        let candidate = pipeline.poll().unwrap();
        assert_eq!(candidate.text, "fresh");
        assert_eq!(candidate.action, TransformAction::Lengthen);
    }

    #[tokio::test]
    async fn test_wait_reports_backend_failure() {
        let backend: ManualBackend<String> = ManualBackend::new();
        let mut pipeline = TextTransformPipeline::new(backend.clone());

        pipeline.request(TransformAction::Summarize, "long text").unwrap();
        backend.take_reporter().unwrap().fail("service unavailable");

        assert_eq!(
            pipeline.wait().await,
            Err(TransformError::Failed("service unavailable".to_string()))
        );
        assert_eq!(pipeline.last_error(), Some("service unavailable"));
        assert!(pipeline.candidate().is_none());
    }
}
