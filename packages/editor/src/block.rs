//! # Blocks
//!
//! A block is one typed unit of course content with a position in its page.
//!
//! ## Content model
//!
//! `BlockContent` is a closed sum type: one variant per block type, each
//! carrying only its own fields. The variant *is* the block type, so a block
//! can never hold a payload inconsistent with its declared type.
//!
//! ```text
//! Block { id, order, content: BlockContent::Quiz(QuizContent { .. }) }
//!                              └── kind() == BlockKind::Quiz
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::mutations::MutationError;

/// Opaque block identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Block type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Quiz,
    Timeline,
    InteractiveTimeline,
    Matching,
    MatchingGame,
    Flashcards,
    Poll,
    Survey,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Quiz,
        BlockKind::Timeline,
        BlockKind::InteractiveTimeline,
        BlockKind::Matching,
        BlockKind::MatchingGame,
        BlockKind::Flashcards,
        BlockKind::Poll,
        BlockKind::Survey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Quiz => "quiz",
            BlockKind::Timeline => "timeline",
            BlockKind::InteractiveTimeline => "interactive-timeline",
            BlockKind::Matching => "matching",
            BlockKind::MatchingGame => "matching-game",
            BlockKind::Flashcards => "flashcards",
            BlockKind::Poll => "poll",
            BlockKind::Survey => "survey",
        }
    }

    /// Human readable label for block pickers
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Text => "Heading and Text",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
            BlockKind::Quiz => "Interactive Quiz",
            BlockKind::Timeline => "Timeline",
            BlockKind::InteractiveTimeline => "Interactive Timeline",
            BlockKind::Matching => "Matching",
            BlockKind::MatchingGame => "Matching Game",
            BlockKind::Flashcards => "Flashcards",
            BlockKind::Poll => "Poll",
            BlockKind::Survey => "Survey",
        }
    }

    /// Payload a freshly added block of this type starts with
    pub fn default_content(&self) -> BlockContent {
        match self {
            BlockKind::Text => BlockContent::Text(TextContent {
                title: "New Title".to_string(),
                body: "Type your content here...".to_string(),
            }),
            BlockKind::Image => BlockContent::Image(ImageContent {
                src: "/placeholder.svg".to_string(),
                alt: "New image".to_string(),
                caption: String::new(),
            }),
            BlockKind::Video => BlockContent::Video(VideoContent {
                url: String::new(),
                title: "New Video".to_string(),
                description: String::new(),
            }),
            BlockKind::Quiz => BlockContent::Quiz(QuizContent {
                question: "Your question here?".to_string(),
                options: vec!["Option 1".to_string(), "Option 2".to_string()],
                correct: 0,
            }),
            BlockKind::Timeline => BlockContent::Timeline(TimelineContent::single_event()),
            BlockKind::InteractiveTimeline => {
                BlockContent::InteractiveTimeline(TimelineContent::single_event())
            }
            BlockKind::Matching => BlockContent::Matching(MatchingContent::single_pair()),
            BlockKind::MatchingGame => BlockContent::MatchingGame(MatchingContent::single_pair()),
            BlockKind::Flashcards => BlockContent::Flashcards(FlashcardsContent {
                cards: vec![Flashcard {
                    front: "Front".to_string(),
                    back: "Back".to_string(),
                }],
            }),
            BlockKind::Poll => BlockContent::Poll(PollContent {
                question: "What is your choice?".to_string(),
                options: vec!["Yes".to_string(), "No".to_string()],
            }),
            BlockKind::Survey => BlockContent::Survey(SurveyContent {
                question: "Leave your feedback:".to_string(),
            }),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MutationError::InvalidBlockType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContent {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizContent {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineContent {
    pub events: Vec<TimelineEvent>,
}

impl TimelineContent {
    fn single_event() -> Self {
        Self {
            events: vec![TimelineEvent {
                date: "2024".to_string(),
                title: "Event".to_string(),
                description: "Description".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingContent {
    pub pairs: Vec<MatchingPair>,
}

impl MatchingContent {
    fn single_pair() -> Self {
        Self {
            pairs: vec![MatchingPair {
                left: "Concept".to_string(),
                right: "Definition".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardsContent {
    pub cards: Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollContent {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyContent {
    pub question: String,
}

/// Typed block payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockContent {
    Text(TextContent),
    Image(ImageContent),
    Video(VideoContent),
    Quiz(QuizContent),
    Timeline(TimelineContent),
    InteractiveTimeline(TimelineContent),
    Matching(MatchingContent),
    MatchingGame(MatchingContent),
    Flashcards(FlashcardsContent),
    Poll(PollContent),
    Survey(SurveyContent),
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Video(_) => BlockKind::Video,
            BlockContent::Quiz(_) => BlockKind::Quiz,
            BlockContent::Timeline(_) => BlockKind::Timeline,
            BlockContent::InteractiveTimeline(_) => BlockKind::InteractiveTimeline,
            BlockContent::Matching(_) => BlockKind::Matching,
            BlockContent::MatchingGame(_) => BlockKind::MatchingGame,
            BlockContent::Flashcards(_) => BlockKind::Flashcards,
            BlockContent::Poll(_) => BlockKind::Poll,
            BlockContent::Survey(_) => BlockKind::Survey,
        }
    }

    /// Check the payload is internally consistent
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            BlockContent::Quiz(quiz) => {
                if quiz.options.is_empty() {
                    return Err(MutationError::InvalidContent(
                        "quiz needs at least one option".to_string(),
                    ));
                }
                if quiz.correct >= quiz.options.len() {
                    return Err(MutationError::InvalidContent(format!(
                        "correct option {} out of range for {} options",
                        quiz.correct,
                        quiz.options.len()
                    )));
                }
                Ok(())
            }
            BlockContent::Poll(poll) if poll.options.is_empty() => Err(
                MutationError::InvalidContent("poll needs at least one option".to_string()),
            ),
            BlockContent::Text(_)
            | BlockContent::Image(_)
            | BlockContent::Video(_)
            | BlockContent::Timeline(_)
            | BlockContent::InteractiveTimeline(_)
            | BlockContent::Matching(_)
            | BlockContent::MatchingGame(_)
            | BlockContent::Flashcards(_)
            | BlockContent::Poll(_)
            | BlockContent::Survey(_) => Ok(()),
        }
    }

    /// The free-text field an assistant rewrite targets, if the type has one
    pub fn primary_text(&self) -> Option<&str> {
        match self {
            BlockContent::Text(text) => Some(&text.body),
            BlockContent::Image(image) => Some(&image.caption),
            BlockContent::Video(video) => Some(&video.description),
            BlockContent::Quiz(quiz) => Some(&quiz.question),
            BlockContent::Poll(poll) => Some(&poll.question),
            BlockContent::Survey(survey) => Some(&survey.question),
            BlockContent::Timeline(_)
            | BlockContent::InteractiveTimeline(_)
            | BlockContent::Matching(_)
            | BlockContent::MatchingGame(_)
            | BlockContent::Flashcards(_) => None,
        }
    }

    /// Copy of this payload with the primary text slot replaced
    pub fn with_primary_text(&self, text: &str) -> Option<BlockContent> {
        let mut next = self.clone();
        let slot = match &mut next {
            BlockContent::Text(c) => &mut c.body,
            BlockContent::Image(c) => &mut c.caption,
            BlockContent::Video(c) => &mut c.description,
            BlockContent::Quiz(c) => &mut c.question,
            BlockContent::Poll(c) => &mut c.question,
            BlockContent::Survey(c) => &mut c.question,
            BlockContent::Timeline(_)
            | BlockContent::InteractiveTimeline(_)
            | BlockContent::Matching(_)
            | BlockContent::MatchingGame(_)
            | BlockContent::Flashcards(_) => return None,
        };
        *slot = text.to_string();
        Some(next)
    }
}

/// A single ordered unit of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    pub(crate) order: usize,
    pub(crate) content: BlockContent,
}

impl Block {
    pub(crate) fn new(id: BlockId, order: usize, content: BlockContent) -> Self {
        Self { id, order, content }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }
}
