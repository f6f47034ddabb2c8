//! Generation configuration
//!
//! Every option here changes what the backend is asked to produce. Ranges
//! depend on the wizard: a course quiz is a handful of questions, a
//! standalone quiz can be much longer.

use serde::{Deserialize, Serialize};

use crate::errors::WizardError;
use crate::request::WizardKind;

/// Implements `Display` and `FromStr` through the serde kebab-case names
macro_rules! kebab_names {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match serde_json::to_value(self) {
                        Ok(serde_json::Value::String(name)) => f.write_str(&name),
                        _ => write!(f, "{:?}", self),
                    }
                }
            }

            impl std::str::FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    serde_json::from_value(serde_json::Value::String(s.to_string()))
                        .map_err(|_| format!("unknown {}: {}", stringify!($ty), s))
                }
            }
        )*
    };
}

pub(crate) use kebab_names;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Academic,
    Friendly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    OpenEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageStyle {
    #[default]
    Modern,
    Minimalist,
    Colorful,
    Professional,
    Illustrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMethod {
    #[default]
    Link,
    Embed,
    Pdf,
    Scorm,
}

kebab_names!(Tone, Difficulty, QuestionType, ImageStyle, DeliveryMethod);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub language: String,
    pub tone: Tone,
    pub focus_areas: Vec<String>,

    /// Quiz questions to generate
    pub quiz_questions: u8,
    /// Survey questions appended to a course
    pub feedback_questions: u8,
    pub question_types: Vec<QuestionType>,
    pub difficulty: Difficulty,
    pub include_explanations: bool,
    pub randomize_order: bool,

    pub image_style: ImageStyle,
    pub include_timeline: bool,
    pub include_matching_game: bool,
    pub include_interactive_elements: bool,
    pub generate_images: bool,
    pub anti_hallucination: bool,
    pub delivery_method: DeliveryMethod,

    /// Target length of an interactive activity
    pub duration_minutes: u8,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            tone: Tone::Professional,
            focus_areas: Vec::new(),
            quiz_questions: 5,
            feedback_questions: 3,
            question_types: vec![QuestionType::MultipleChoice, QuestionType::TrueFalse],
            difficulty: Difficulty::Medium,
            include_explanations: true,
            randomize_order: true,
            image_style: ImageStyle::Modern,
            include_timeline: false,
            include_matching_game: false,
            include_interactive_elements: true,
            generate_images: false,
            anti_hallucination: true,
            delivery_method: DeliveryMethod::Link,
            duration_minutes: 5,
        }
    }
}

impl GenerationConfig {
    /// Defaults tuned for a wizard
    pub fn for_kind(kind: WizardKind) -> Self {
        match kind {
            WizardKind::Quiz => Self {
                quiz_questions: 10,
                question_types: vec![QuestionType::MultipleChoice],
                ..Self::default()
            },
            WizardKind::Course | WizardKind::Interaction => Self::default(),
        }
    }

    /// Reject values the wizard cannot generate
    pub fn validate(&self, kind: WizardKind) -> Result<(), WizardError> {
        if self.language.trim().is_empty() {
            return Err(invalid("language must not be empty"));
        }

        match kind {
            WizardKind::Course => {
                check_range("quiz questions", self.quiz_questions, 1, 20)?;
                check_range("feedback questions", self.feedback_questions, 1, 10)?;
            }
            WizardKind::Quiz => {
                check_range("quiz questions", self.quiz_questions, 5, 50)?;
                if self.question_types.is_empty() {
                    return Err(invalid("select at least one question type"));
                }
            }
            WizardKind::Interaction => {
                check_range("duration minutes", self.duration_minutes, 1, 30)?;
            }
        }

        Ok(())
    }

    /// Question types to cycle through, never empty
    pub fn effective_question_types(&self) -> Vec<QuestionType> {
        if self.question_types.is_empty() {
            vec![QuestionType::MultipleChoice]
        } else {
            self.question_types.clone()
        }
    }
}

fn check_range(name: &str, value: u8, min: u8, max: u8) -> Result<(), WizardError> {
    if value < min || value > max {
        return Err(invalid(&format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn invalid(message: &str) -> WizardError {
    WizardError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for kind in [WizardKind::Course, WizardKind::Quiz, WizardKind::Interaction] {
            assert!(GenerationConfig::for_kind(kind).validate(kind).is_ok(), "{:?}", kind);
        }
    }

    #[test]
    fn test_ranges_depend_on_kind() {
        let config = GenerationConfig {
            quiz_questions: 30,
            ..GenerationConfig::default()
        };

        assert!(matches!(
            config.validate(WizardKind::Course),
            Err(WizardError::InvalidConfig(_))
        ));
        assert!(config.validate(WizardKind::Quiz).is_ok());
    }

    #[test]
    fn test_quiz_needs_question_types() {
        let config = GenerationConfig {
            quiz_questions: 10,
            question_types: Vec::new(),
            ..GenerationConfig::default()
        };

        assert!(config.validate(WizardKind::Quiz).is_err());
        assert_eq!(config.effective_question_types(), vec![QuestionType::MultipleChoice]);
    }

    #[test]
    fn test_names_round_trip_through_strings() {
        assert_eq!("academic".parse::<Tone>(), Ok(Tone::Academic));
        assert_eq!(QuestionType::TrueFalse.to_string(), "true-false");
        assert!("loud".parse::<Tone>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"language":"Portuguese","includeTimeline":true}"#).unwrap();

        assert_eq!(config.language, "Portuguese");
        assert!(config.include_timeline);
        assert_eq!(config.quiz_questions, 5);
    }
}
