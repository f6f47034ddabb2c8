//! What a wizard asks the generation backend for

use serde::{Deserialize, Serialize};

use crate::config::{kebab_names, GenerationConfig};
use crate::errors::WizardError;

/// Which wizard is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardKind {
    Course,
    Quiz,
    Interaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    Timeline,
    MatchingGame,
    Flashcards,
    Poll,
    Scenario,
    KnowledgeCheck,
}

kebab_names!(WizardKind, InteractionType);

impl InteractionType {
    pub const ALL: [InteractionType; 6] = [
        InteractionType::Timeline,
        InteractionType::MatchingGame,
        InteractionType::Flashcards,
        InteractionType::Poll,
        InteractionType::Scenario,
        InteractionType::KnowledgeCheck,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InteractionType::Timeline => "Interactive Timeline",
            InteractionType::MatchingGame => "Matching Game",
            InteractionType::Flashcards => "Flashcards",
            InteractionType::Poll => "Interactive Poll",
            InteractionType::Scenario => "Scenario Simulation",
            InteractionType::KnowledgeCheck => "Knowledge Check",
        }
    }
}

/// Creation path picked in the first wizard step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum CreationMethod {
    FromDescription,
    FromUpload { file_name: String },
    FromKnowledgeBase,
    FromExistingContent { sections: Vec<String> },
    Interactive { interaction: InteractionType },
}

impl CreationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CreationMethod::FromDescription => "from-description",
            CreationMethod::FromUpload { .. } => "from-upload",
            CreationMethod::FromKnowledgeBase => "from-knowledge-base",
            CreationMethod::FromExistingContent { .. } => "from-existing-content",
            CreationMethod::Interactive { .. } => "interactive",
        }
    }

    pub fn allowed_for(&self, kind: WizardKind) -> bool {
        match (kind, self) {
            (WizardKind::Course, CreationMethod::FromDescription)
            | (WizardKind::Course, CreationMethod::FromUpload { .. })
            | (WizardKind::Course, CreationMethod::FromKnowledgeBase) => true,
            (WizardKind::Quiz, CreationMethod::FromExistingContent { .. })
            | (WizardKind::Quiz, CreationMethod::FromUpload { .. })
            | (WizardKind::Quiz, CreationMethod::FromKnowledgeBase) => true,
            (WizardKind::Interaction, CreationMethod::Interactive { .. }) => true,
            _ => false,
        }
    }

    /// Check the data the method itself carries
    pub fn validate(&self) -> Result<(), WizardError> {
        match self {
            CreationMethod::FromUpload { file_name } => {
                if !file_name.to_ascii_lowercase().ends_with(".pdf") {
                    return Err(WizardError::MissingInput(format!(
                        "a PDF file is required, got {:?}",
                        file_name
                    )));
                }
            }
            CreationMethod::FromExistingContent { sections } => {
                if sections.iter().all(|s| s.trim().is_empty()) {
                    return Err(WizardError::MissingInput(
                        "select at least one content section".to_string(),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Free-text fields from the input step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputFields {
    pub focus: String,
    pub target_audience: String,
    pub description: String,
    pub profession: String,
}

impl InputFields {
    pub fn validate(&self, method: &CreationMethod) -> Result<(), WizardError> {
        match method {
            CreationMethod::FromDescription | CreationMethod::FromKnowledgeBase => {
                if self.focus.trim().is_empty() && self.description.trim().is_empty() {
                    return Err(WizardError::MissingInput(
                        "describe the focus or content of the course".to_string(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Main subject, falling back to the start of the description
    pub fn topic(&self) -> String {
        let focus = self.focus.trim();
        if !focus.is_empty() {
            return focus.to_string();
        }
        let words: Vec<&str> = self.description.split_whitespace().take(4).collect();
        if words.is_empty() {
            "Your Topic".to_string()
        } else {
            words.join(" ")
        }
    }
}

/// Everything a generation backend needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub kind: WizardKind,
    pub method: CreationMethod,
    pub input: InputFields,
    pub config: GenerationConfig,
}

impl GenerationRequest {
    /// Job phases, in reporting order
    pub fn phases(&self) -> Vec<&'static str> {
        match self.kind {
            WizardKind::Course => vec![
                "analyzing content",
                "creating structure",
                "generating quizzes",
                "finalizing",
            ],
            WizardKind::Quiz => vec!["analyzing content", "generating questions", "finalizing"],
            WizardKind::Interaction => vec![
                "analyzing content",
                "creating interactive elements",
                "finalizing",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_per_wizard() {
        let upload = CreationMethod::FromUpload {
            file_name: "notes.pdf".to_string(),
        };
        assert!(upload.allowed_for(WizardKind::Course));
        assert!(upload.allowed_for(WizardKind::Quiz));
        assert!(!upload.allowed_for(WizardKind::Interaction));

        let interactive = CreationMethod::Interactive {
            interaction: InteractionType::Flashcards,
        };
        assert!(interactive.allowed_for(WizardKind::Interaction));
        assert!(!CreationMethod::FromDescription.allowed_for(WizardKind::Quiz));
    }

    #[test]
    fn test_upload_requires_pdf() {
        let method = CreationMethod::FromUpload {
            file_name: "slides.pptx".to_string(),
        };
        assert!(matches!(method.validate(), Err(WizardError::MissingInput(_))));

        let method = CreationMethod::FromUpload {
            file_name: "Slides.PDF".to_string(),
        };
        assert!(method.validate().is_ok());
    }

    #[test]
    fn test_description_needs_focus_or_text() {
        let empty = InputFields::default();
        assert!(empty.validate(&CreationMethod::FromDescription).is_err());

        let fields = InputFields {
            description: "How computers talk to each other over networks".to_string(),
            ..InputFields::default()
        };
        assert!(fields.validate(&CreationMethod::FromDescription).is_ok());
        assert_eq!(fields.topic(), "How computers talk to");
    }

    #[test]
    fn test_method_serialization() {
        let method = CreationMethod::Interactive {
            interaction: InteractionType::KnowledgeCheck,
        };
        let json = serde_json::to_string(&method).unwrap();

        assert_eq!(json, r#"{"method":"interactive","interaction":"knowledge-check"}"#);
    }
}
