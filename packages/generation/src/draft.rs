//! # Generation Drafts
//!
//! A draft is what a finished job hands to the wizard's review step. It
//! is edited freely and never touches a [`BlockDocument`] until
//! [`Draft::materialize`] turns it into `add_block` calls.

use coursecraft_editor::{
    BlockContent, BlockDocument, BlockId, BlockKind, ImageContent, MatchingContent, MutationError,
    QuizContent, SurveyContent, TextContent, TimelineContent,
};
use serde::{Deserialize, Serialize};

use crate::config::QuestionType;
use crate::errors::DraftError;
use crate::request::InteractionType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Draft {
    Course(CourseDraft),
    Quiz(QuizDraft),
    Interaction(InteractionDraft),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineSection {
    pub id: u32,
    pub title: String,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question_type: QuestionType,
    pub question: String,
    /// Empty for open-ended questions
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Block payload for this question
    ///
    /// True/false becomes a two-option quiz and open-ended a survey.
    pub fn to_content(&self) -> BlockContent {
        match self.question_type {
            QuestionType::MultipleChoice => BlockContent::Quiz(QuizContent {
                question: self.question.clone(),
                options: self.options.clone(),
                correct: self.correct,
            }),
            QuestionType::TrueFalse => BlockContent::Quiz(QuizContent {
                question: self.question.clone(),
                options: vec!["True".to_string(), "False".to_string()],
                correct: self.correct.min(1),
            }),
            QuestionType::OpenEnded => BlockContent::Survey(SurveyContent {
                question: self.question.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    /// Suggested titles
    pub titles: Vec<String>,
    pub selected_title: Option<usize>,
    pub custom_title: Option<String>,
    pub sections: Vec<OutlineSection>,
    pub quiz: Vec<QuizQuestion>,
    pub timeline: Option<TimelineContent>,
    pub matching: Option<MatchingContent>,
    pub feedback: Vec<String>,
    pub generate_images: bool,
    pub summary: String,
}

impl CourseDraft {
    /// Chosen title: a custom title wins over a suggestion
    pub fn title(&self) -> Option<&str> {
        if let Some(custom) = self.custom_title.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(custom);
        }
        self.selected_title
            .and_then(|i| self.titles.get(i))
            .map(String::as_str)
    }

    pub fn select_title(&mut self, index: usize) -> Result<(), DraftError> {
        if index >= self.titles.len() {
            return Err(DraftError::TitleOutOfRange(index));
        }
        self.selected_title = Some(index);
        self.custom_title = None;
        Ok(())
    }

    pub fn set_custom_title(&mut self, title: impl Into<String>) {
        self.custom_title = Some(title.into());
    }

    pub fn section(&self, id: u32) -> Option<&OutlineSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Append a section with one placeholder page, returning its id
    pub fn add_section(&mut self, title: impl Into<String>) -> u32 {
        let id = self.sections.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.sections.push(OutlineSection {
            id,
            title: title.into(),
            pages: vec!["New Page".to_string()],
        });
        id
    }

    pub fn remove_section(&mut self, id: u32) -> Result<OutlineSection, DraftError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == id)
            .ok_or(DraftError::SectionNotFound(id))?;
        Ok(self.sections.remove(index))
    }

    pub fn rename_section(&mut self, id: u32, title: impl Into<String>) -> Result<(), DraftError> {
        self.section_mut(id)?.title = title.into();
        Ok(())
    }

    /// Append a page to a section, returning its index
    pub fn add_page(
        &mut self,
        section: u32,
        title: impl Into<String>,
    ) -> Result<usize, DraftError> {
        let pages = &mut self.section_mut(section)?.pages;
        pages.push(title.into());
        Ok(pages.len() - 1)
    }

    pub fn remove_page(&mut self, section: u32, index: usize) -> Result<String, DraftError> {
        let pages = &mut self.section_mut(section)?.pages;
        if index >= pages.len() {
            return Err(DraftError::PageOutOfRange { section, index });
        }
        Ok(pages.remove(index))
    }

    pub fn rename_page(
        &mut self,
        section: u32,
        index: usize,
        title: impl Into<String>,
    ) -> Result<(), DraftError> {
        let page = self
            .section_mut(section)?
            .pages
            .get_mut(index)
            .ok_or(DraftError::PageOutOfRange { section, index })?;
        *page = title.into();
        Ok(())
    }

    fn section_mut(&mut self, id: u32) -> Result<&mut OutlineSection, DraftError> {
        self.sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DraftError::SectionNotFound(id))
    }

    fn contents(&self) -> Vec<BlockContent> {
        let mut contents = Vec::new();

        for section in &self.sections {
            contents.push(BlockContent::Text(TextContent {
                title: section.title.clone(),
                body: String::new(),
            }));
            if self.generate_images {
                contents.push(BlockContent::Image(ImageContent {
                    src: "/placeholder.svg".to_string(),
                    alt: section.title.clone(),
                    caption: section.title.clone(),
                }));
            }
            for page in &section.pages {
                contents.push(BlockContent::Text(TextContent {
                    title: page.clone(),
                    body: String::new(),
                }));
            }
        }

        if let Some(timeline) = &self.timeline {
            contents.push(BlockContent::InteractiveTimeline(timeline.clone()));
        }
        if let Some(matching) = &self.matching {
            contents.push(BlockContent::MatchingGame(matching.clone()));
        }
        contents.extend(self.quiz.iter().map(QuizQuestion::to_content));
        contents.extend(self.feedback.iter().map(|question| {
            BlockContent::Survey(SurveyContent {
                question: question.clone(),
            })
        }));

        contents
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

impl QuizDraft {
    pub fn remove_question(&mut self, index: usize) -> Result<QuizQuestion, DraftError> {
        if index >= self.questions.len() {
            return Err(DraftError::QuestionOutOfRange(index));
        }
        Ok(self.questions.remove(index))
    }

    pub fn question_mut(&mut self, index: usize) -> Result<&mut QuizQuestion, DraftError> {
        self.questions
            .get_mut(index)
            .ok_or(DraftError::QuestionOutOfRange(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDraft {
    pub interaction: InteractionType,
    pub title: String,
    pub blocks: Vec<BlockContent>,
}

impl Draft {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Draft::Course(_) => "course",
            Draft::Quiz(_) => "quiz",
            Draft::Interaction(_) => "interaction",
        }
    }

    pub fn as_course_mut(&mut self) -> Result<&mut CourseDraft, DraftError> {
        match self {
            Draft::Course(course) => Ok(course),
            _ => Err(DraftError::WrongDraft("course")),
        }
    }

    pub fn as_quiz_mut(&mut self) -> Result<&mut QuizDraft, DraftError> {
        match self {
            Draft::Quiz(quiz) => Ok(quiz),
            _ => Err(DraftError::WrongDraft("quiz")),
        }
    }

    /// Title given to the document on acceptance
    pub fn title(&self) -> Option<&str> {
        match self {
            Draft::Course(course) => course.title(),
            Draft::Quiz(quiz) => Some(quiz.title.as_str()),
            Draft::Interaction(interaction) => Some(interaction.title.as_str()),
        }
    }

    /// Block payloads in the order they are added
    pub fn contents(&self) -> Vec<BlockContent> {
        match self {
            Draft::Course(course) => course.contents(),
            Draft::Quiz(quiz) => quiz.questions.iter().map(QuizQuestion::to_content).collect(),
            Draft::Interaction(interaction) => interaction.blocks.clone(),
        }
    }

    /// Append the draft to `doc`, all or nothing
    ///
    /// Every block is added to a copy first; `doc` is only replaced when
    /// all of them were accepted.
    pub fn materialize(&self, doc: &mut BlockDocument) -> Result<Vec<BlockId>, MutationError> {
        let mut staged = doc.clone();

        if let Some(title) = self.title().filter(|t| !t.trim().is_empty()) {
            staged.set_title(title);
        }

        let mut added = Vec::new();
        for content in self.contents() {
            let kind: BlockKind = content.kind();
            added.push(staged.add_block(kind, Some(content))?.id().clone());
        }

        tracing::debug!(
            "materialized {} draft into {} blocks",
            self.kind_name(),
            added.len()
        );
        *doc = staged;
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecraft_editor::{MatchingPair, TimelineEvent};

    fn course() -> CourseDraft {
        CourseDraft {
            titles: vec!["Networks 101".to_string(), "Understanding Networks".to_string()],
            selected_title: None,
            custom_title: None,
            sections: vec![
                OutlineSection {
                    id: 1,
                    title: "Introduction".to_string(),
                    pages: vec!["What is a network".to_string()],
                },
                OutlineSection {
                    id: 2,
                    title: "Protocols".to_string(),
                    pages: vec!["TCP".to_string(), "UDP".to_string()],
                },
            ],
            quiz: vec![QuizQuestion {
                question_type: QuestionType::TrueFalse,
                question: "UDP guarantees delivery".to_string(),
                options: Vec::new(),
                correct: 1,
                explanation: String::new(),
            }],
            timeline: None,
            matching: None,
            feedback: vec!["What did you learn?".to_string()],
            generate_images: false,
            summary: String::new(),
        }
    }

    #[test]
    fn test_outline_editing() {
        let mut draft = course();

        let id = draft.add_section("Security");
        assert_eq!(id, 3);
        assert_eq!(draft.section(3).unwrap().pages, vec!["New Page".to_string()]);

        assert_eq!(draft.add_page(2, "QUIC").unwrap(), 2);
        draft.rename_page(2, 0, "TCP in depth").unwrap();
        assert_eq!(draft.remove_page(2, 1).unwrap(), "UDP");
        assert_eq!(
            draft.remove_page(2, 5),
            Err(DraftError::PageOutOfRange { section: 2, index: 5 })
        );

        draft.remove_section(1).unwrap();
        assert_eq!(draft.rename_section(1, "x"), Err(DraftError::SectionNotFound(1)));
    }

    #[test]
    fn test_title_selection() {
        let mut draft = course();
        assert_eq!(draft.title(), None);

        draft.select_title(1).unwrap();
        assert_eq!(draft.title(), Some("Understanding Networks"));

        draft.set_custom_title("My Own Title");
        assert_eq!(draft.title(), Some("My Own Title"));

        assert_eq!(draft.select_title(9), Err(DraftError::TitleOutOfRange(9)));
    }

    #[test]
    fn test_course_materialization_order() {
        let mut draft = course();
        draft.generate_images = true;
        draft.timeline = Some(TimelineContent {
            events: vec![TimelineEvent {
                date: "1969".to_string(),
                title: "ARPANET".to_string(),
                description: String::new(),
            }],
        });
        draft.matching = Some(MatchingContent {
            pairs: vec![MatchingPair {
                left: "TCP".to_string(),
                right: "Reliable stream".to_string(),
            }],
        });

        let mut doc = BlockDocument::new("networks");
        let ids = Draft::Course(draft).materialize(&mut doc).unwrap();

        let kinds: Vec<BlockKind> = doc.blocks().iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Text,
                BlockKind::Image,
                BlockKind::Text,
                BlockKind::Text,
                BlockKind::Image,
                BlockKind::Text,
                BlockKind::Text,
                BlockKind::InteractiveTimeline,
                BlockKind::MatchingGame,
                BlockKind::Quiz,
                BlockKind::Survey,
            ]
        );
        assert_eq!(ids.len(), doc.len());
        assert!(doc.is_dense());
    }

    #[test]
    fn test_materialization_is_all_or_nothing() {
        let mut draft = course();
        draft.quiz.push(QuizQuestion {
            question_type: QuestionType::MultipleChoice,
            question: "Broken".to_string(),
            options: vec!["only".to_string()],
            correct: 3,
            explanation: String::new(),
        });

        let mut doc = BlockDocument::new("networks");
        doc.add_block(BlockKind::Video, None).unwrap();
        let before = doc.snapshot();

        assert!(Draft::Course(draft).materialize(&mut doc).is_err());
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_quiz_draft_editing() {
        let mut draft = Draft::Quiz(QuizDraft {
            title: "Check".to_string(),
            questions: course().quiz,
        });

        assert!(draft.as_course_mut().is_err());
        let quiz = draft.as_quiz_mut().unwrap();
        quiz.question_mut(0).unwrap().question = "TCP is connection oriented".to_string();
        assert!(quiz.remove_question(1).is_err());
        quiz.remove_question(0).unwrap();

        assert!(draft.contents().is_empty());
    }
}
