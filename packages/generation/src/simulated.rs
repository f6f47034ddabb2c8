//! # Simulated Generation
//!
//! Stand-in for an AI service: walks through the request's phases on a
//! timer and finishes with a draft built from the request alone. The
//! config options shape the draft the same way a real service would be
//! asked to.

use std::time::Duration;

use tokio::task::JoinHandle;

use coursecraft_editor::{
    BlockContent, Flashcard, FlashcardsContent, MatchingContent, MatchingPair, PollContent,
    QuizContent, TextContent, TimelineContent, TimelineEvent,
};

use crate::backend::GenerationBackend;
use crate::config::{GenerationConfig, QuestionType, Tone};
use crate::draft::{CourseDraft, Draft, InteractionDraft, OutlineSection, QuizDraft, QuizQuestion};
use crate::job::{job_channel, JobChannel, JobReporter};
use crate::request::{CreationMethod, GenerationRequest, InteractionType, WizardKind};

#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    step_delay: Duration,
    steps_per_phase: u8,
    failure: Option<String>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), 4)
    }
}

impl SimulatedBackend {
    pub fn new(step_delay: Duration, steps_per_phase: u8) -> Self {
        Self {
            step_delay,
            steps_per_phase: steps_per_phase.max(1),
            failure: None,
        }
    }

    /// Fail every job after its first phase
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Spawn the timed run; fails the job when there is no runtime
    fn spawn(
        &self,
        reporter: JobReporter<Draft>,
        request: &GenerationRequest,
    ) -> Option<JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("simulated generation needs a tokio runtime: {}", e);
                reporter.fail("no async runtime available for generation");
                return None;
            }
        };

        let request = request.clone();
        let phases = request.phases().len();
        let delay = self.step_delay;
        let steps = self.steps_per_phase as u32;
        let failure = self.failure.clone();

        let task = runtime.spawn(async move {
            for phase in 0..phases {
                for step in 1..=steps {
                    tokio::time::sleep(delay).await;
                    let progress = (step * 100 / steps) as u8;
                    if !reporter.progress(phase, progress) {
                        return;
                    }
                }
                if let Some(reason) = &failure {
                    reporter.fail(reason.clone());
                    return;
                }
            }
            reporter.succeed(build_draft(&request));
        });

        Some(task)
    }
}

impl GenerationBackend for SimulatedBackend {
    fn run_generation(&self, request: &GenerationRequest) -> JobChannel<Draft> {
        let (reporter, channel) = job_channel();
        match self.spawn(reporter, request) {
            Some(task) => channel.with_task(task.abort_handle()),
            None => channel,
        }
    }
}

/// Draft the simulated service returns for `request`
pub fn build_draft(request: &GenerationRequest) -> Draft {
    match request.kind {
        WizardKind::Course => Draft::Course(course_draft(request)),
        WizardKind::Quiz => Draft::Quiz(QuizDraft {
            title: format!("Quiz: {}", request.input.topic()),
            questions: questions(&request.input.topic(), &request.config),
        }),
        WizardKind::Interaction => Draft::Interaction(interaction_draft(request)),
    }
}

fn course_draft(request: &GenerationRequest) -> CourseDraft {
    let topic = request.input.topic();
    let config = &request.config;

    let tone_title = match config.tone {
        Tone::Professional => format!("{} for Professionals", topic),
        Tone::Casual => format!("{} Made Easy", topic),
        Tone::Academic => format!("{}: Theory and Principles", topic),
        Tone::Friendly => format!("Getting Comfortable with {}", topic),
    };
    let language = config.language.trim();
    let titles = [
        format!("Introduction to {}: Concepts and Applications", topic),
        format!("Understanding {}: A Beginner's Guide", topic),
        format!("Navigating {}: Essential Skills for Everyday Use", topic),
        format!("Foundations of {}: Building Blocks for Future Learning", topic),
        format!("{} in Practice: Insights for the Modern Learner", topic),
        tone_title,
    ]
    .into_iter()
    .map(|title| {
        if language.is_empty() || language.eq_ignore_ascii_case("english") {
            title
        } else {
            format!("{} ({})", title, language)
        }
    })
    .collect();

    let mut outline = Vec::new();
    if let CreationMethod::FromUpload { file_name } = &request.method {
        outline.push((
            format!("Key Ideas from {}", file_name),
            vec![format!("Summary of {}", file_name), "Main takeaways".to_string()],
        ));
    }
    outline.push((
        format!("Introduction to {}", topic),
        vec![
            format!("Definition of {}", topic),
            format!("Overview of {} and its importance", topic),
        ],
    ));
    outline.push((
        "Historical Context".to_string(),
        vec![
            format!("Origins of {}", topic),
            "Key milestones".to_string(),
        ],
    ));
    outline.push((
        format!("Fundamental Concepts of {}", topic),
        vec!["Core principles".to_string(), "Common terminology".to_string()],
    ));
    outline.push((
        format!("Applications of {}", topic),
        vec![
            "Everyday examples".to_string(),
            format!("{} in the workplace", topic),
        ],
    ));

    let sections = outline
        .into_iter()
        .zip(1..)
        .map(|((title, pages), id)| OutlineSection { id, title, pages })
        .collect();

    let timeline = config.include_timeline.then(|| TimelineContent {
        events: vec![
            event("Origins", &format!("Early ideas behind {}", topic)),
            event("Growth", &format!("{} becomes widespread", topic)),
            event("Today", &format!("How {} is used now", topic)),
        ],
    });

    let matching = config.include_matching_game.then(|| MatchingContent {
        pairs: vec![
            pair(&topic, "The subject of this course"),
            pair("Principle", "A rule that explains how something works"),
            pair("Application", "A practical use of an idea"),
        ],
    });

    let feedback = (1..=config.feedback_questions)
        .map(|n| match n {
            1 => "What was the most useful part of this course?".to_string(),
            2 => "What would you like to learn more about?".to_string(),
            3 => "How would you rate the pace of the course?".to_string(),
            n => format!("Feedback question {}", n),
        })
        .collect();

    CourseDraft {
        titles,
        selected_title: Some(0),
        custom_title: None,
        sections,
        quiz: questions(&topic, config),
        timeline,
        matching,
        feedback,
        generate_images: config.generate_images,
        summary: format!(
            "{} course on {} in {} with a {} tone{}",
            config.difficulty,
            topic,
            config.language,
            config.tone,
            audience_suffix(&request.input.target_audience)
        ),
    }
}

fn audience_suffix(audience: &str) -> String {
    if audience.trim().is_empty() {
        String::new()
    } else {
        format!(" for {}", audience.trim())
    }
}

fn questions(topic: &str, config: &GenerationConfig) -> Vec<QuizQuestion> {
    let types = config.effective_question_types();

    (0..config.quiz_questions as usize)
        .map(|i| {
            let question_type = types[i % types.len()];
            let n = i + 1;
            let explanation = if config.include_explanations {
                format!("Question {} checks a core idea of {}.", n, topic)
            } else {
                String::new()
            };

            match question_type {
                QuestionType::MultipleChoice => {
                    let mut options = vec![
                        format!("The key principle of {}", topic),
                        "An unrelated idea".to_string(),
                        "A common misconception".to_string(),
                        "None of the above".to_string(),
                    ];
                    let correct = if config.randomize_order { i % options.len() } else { 0 };
                    options.rotate_right(correct);
                    QuizQuestion {
                        question_type,
                        question: format!(
                            "Question {}: Which statement about {} is correct?",
                            n, topic
                        ),
                        options,
                        correct,
                        explanation,
                    }
                }
                QuestionType::TrueFalse => QuizQuestion {
                    question_type,
                    question: format!("Question {}: {} has practical applications.", n, topic),
                    options: vec!["True".to_string(), "False".to_string()],
                    correct: 0,
                    explanation,
                },
                QuestionType::OpenEnded => QuizQuestion {
                    question_type,
                    question: format!("Question {}: Describe how you would apply {}.", n, topic),
                    options: Vec::new(),
                    correct: 0,
                    explanation,
                },
            }
        })
        .collect()
}

fn interaction_draft(request: &GenerationRequest) -> InteractionDraft {
    let topic = request.input.topic();
    let interaction = match &request.method {
        CreationMethod::Interactive { interaction } => *interaction,
        _ => InteractionType::KnowledgeCheck,
    };

    let blocks = match interaction {
        InteractionType::Timeline => vec![BlockContent::InteractiveTimeline(TimelineContent {
            events: vec![
                event("Step 1", &format!("First contact with {}", topic)),
                event("Step 2", "Building the basics"),
                event("Step 3", "Practising in context"),
                event("Step 4", "Mastery"),
            ],
        })],
        InteractionType::MatchingGame => vec![BlockContent::MatchingGame(MatchingContent {
            pairs: vec![
                pair(&topic, "Main subject"),
                pair("Concept", "An abstract idea"),
                pair("Example", "A concrete case"),
                pair("Practice", "Repeated application"),
            ],
        })],
        InteractionType::Flashcards => vec![BlockContent::Flashcards(FlashcardsContent {
            cards: vec![
                card(&format!("What is {}?", topic), &format!("The core subject: {}", topic)),
                card("Why does it matter?", "It solves real problems"),
                card("Where is it used?", "At work and in daily life"),
                card("How do I start?", "Learn the fundamentals first"),
            ],
        })],
        InteractionType::Poll => vec![BlockContent::Poll(PollContent {
            question: format!("How familiar are you with {}?", topic),
            options: vec![
                "Not at all".to_string(),
                "Somewhat".to_string(),
                "Very familiar".to_string(),
            ],
        })],
        InteractionType::Scenario => vec![
            BlockContent::Text(TextContent {
                title: "Scenario".to_string(),
                body: format!(
                    "You are asked to solve a problem involving {} in about {} minutes.",
                    topic, request.config.duration_minutes
                ),
            }),
            BlockContent::Quiz(QuizContent {
                question: "What do you do first?".to_string(),
                options: vec![
                    "Analyse the situation".to_string(),
                    "Act immediately".to_string(),
                    "Ask for help".to_string(),
                ],
                correct: 0,
            }),
        ],
        InteractionType::KnowledgeCheck => vec![
            BlockContent::Quiz(QuizContent {
                question: format!("Which best describes {}?", topic),
                options: vec![
                    format!("The study and use of {}", topic),
                    "Something unrelated".to_string(),
                ],
                correct: 0,
            }),
            BlockContent::Quiz(QuizContent {
                question: format!("{} is only theoretical.", topic),
                options: vec!["True".to_string(), "False".to_string()],
                correct: 1,
            }),
        ],
    };

    InteractionDraft {
        interaction,
        title: format!("{}: {}", interaction.label(), topic),
        blocks,
    }
}

fn event(date: &str, title: &str) -> TimelineEvent {
    TimelineEvent {
        date: date.to_string(),
        title: title.to_string(),
        description: String::new(),
    }
}

fn pair(left: &str, right: &str) -> MatchingPair {
    MatchingPair {
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn card(front: &str, back: &str) -> Flashcard {
    Flashcard {
        front: front.to_string(),
        back: back.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{GenerationJob, JobState, JobUpdate};
    use crate::request::InputFields;
    use coursecraft_editor::BlockDocument;

    fn request(
        kind: WizardKind,
        method: CreationMethod,
        config: GenerationConfig,
    ) -> GenerationRequest {
        GenerationRequest {
            kind,
            method,
            input: InputFields {
                focus: "Basic Technology".to_string(),
                target_audience: "beginners".to_string(),
                ..InputFields::default()
            },
            config,
        }
    }

    #[test]
    fn test_course_draft_honours_config() {
        let config = GenerationConfig {
            language: "Portuguese".to_string(),
            quiz_questions: 4,
            feedback_questions: 2,
            question_types: vec![QuestionType::MultipleChoice, QuestionType::OpenEnded],
            include_timeline: true,
            generate_images: true,
            ..GenerationConfig::default()
        };
        let Draft::Course(draft) =
            build_draft(&request(WizardKind::Course, CreationMethod::FromDescription, config))
        else {
            panic!("expected a course draft");
        };

        assert_eq!(draft.quiz.len(), 4);
        assert_eq!(draft.quiz[1].question_type, QuestionType::OpenEnded);
        assert_eq!(draft.feedback.len(), 2);
        assert!(draft.timeline.is_some());
        assert!(draft.matching.is_none());
        assert!(draft.generate_images);
        assert!(draft.summary.contains("Portuguese"));
        assert!(draft.summary.contains("for beginners"));
        assert_eq!(
            draft.title(),
            Some("Introduction to Basic Technology: Concepts and Applications (Portuguese)")
        );
        assert_eq!(
            draft.titles.last().map(String::as_str),
            Some("Basic Technology for Professionals (Portuguese)")
        );
    }

    #[test]
    fn test_english_titles_follow_tone() {
        let config = GenerationConfig {
            tone: Tone::Casual,
            ..GenerationConfig::default()
        };
        let Draft::Course(draft) =
            build_draft(&request(WizardKind::Course, CreationMethod::FromDescription, config))
        else {
            panic!("expected a course draft");
        };

        assert_eq!(draft.titles.len(), 6);
        assert_eq!(draft.titles[0], "Introduction to Basic Technology: Concepts and Applications");
        assert_eq!(draft.titles[5], "Basic Technology Made Easy");
        assert!(draft.summary.contains("casual tone"));
    }

    #[test]
    fn test_upload_adds_source_section() {
        let method = CreationMethod::FromUpload {
            file_name: "handbook.pdf".to_string(),
        };
        let Draft::Course(draft) =
            build_draft(&request(WizardKind::Course, method, GenerationConfig::default()))
        else {
            panic!("expected a course draft");
        };

        assert_eq!(draft.sections[0].title, "Key Ideas from handbook.pdf");
        assert_eq!(draft.sections.len(), 5);
    }

    #[test]
    fn test_randomized_options_track_correct_answer() {
        let config = GenerationConfig {
            quiz_questions: 8,
            question_types: vec![QuestionType::MultipleChoice],
            randomize_order: true,
            ..GenerationConfig::for_kind(WizardKind::Quiz)
        };
        let draft = build_draft(&request(
            WizardKind::Quiz,
            CreationMethod::FromKnowledgeBase,
            config,
        ));
        let Draft::Quiz(quiz) = draft else {
            panic!("expected a quiz draft");
        };

        for question in &quiz.questions {
            assert!(question.options[question.correct].starts_with("The key principle"));
        }
    }

    #[test]
    fn test_every_interaction_materializes() {
        for interaction in InteractionType::ALL {
            let draft = build_draft(&request(
                WizardKind::Interaction,
                CreationMethod::Interactive { interaction },
                GenerationConfig::default(),
            ));
            let mut doc = BlockDocument::new("activity");
            assert!(draft.materialize(&mut doc).is_ok(), "{:?}", interaction);
            assert!(!doc.is_empty());
        }
    }

    #[test]
    fn test_outside_runtime_fails_job() {
        let backend = SimulatedBackend::new(Duration::from_millis(1), 1);
        let request = request(
            WizardKind::Quiz,
            CreationMethod::FromKnowledgeBase,
            GenerationConfig::for_kind(WizardKind::Quiz),
        );

        let mut job = GenerationJob::new(request.phases());
        job.start_with(backend.run_generation(&request)).unwrap();
        job.poll();

        assert!(matches!(job.state(), JobState::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_run_reports_every_phase() {
        let backend = SimulatedBackend::new(Duration::from_millis(100), 2);
        let request = request(
            WizardKind::Course,
            CreationMethod::FromDescription,
            GenerationConfig::default(),
        );

        let mut job = GenerationJob::new(request.phases());
        job.start_with(backend.run_generation(&request)).unwrap();

        let mut updates = Vec::new();
        while let Some(update) = job.next_update().await {
            updates.push(update);
        }

        assert_eq!(updates.len(), request.phases().len() * 2 + 1);
        assert_eq!(updates.last(), Some(&JobUpdate::Succeeded));
        assert!(matches!(job.state(), JobState::Succeeded(Draft::Course(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_backend_stops_after_first_phase() {
        let backend =
            SimulatedBackend::new(Duration::from_millis(100), 1).failing("quota exceeded");
        let request = request(
            WizardKind::Quiz,
            CreationMethod::FromKnowledgeBase,
            GenerationConfig::for_kind(WizardKind::Quiz),
        );

        let mut job = GenerationJob::new(request.phases());
        job.start_with(backend.run_generation(&request)).unwrap();

        assert_eq!(job.wait().await, &JobState::Failed("quota exceeded".to_string()));
        assert_eq!(job.phases()[0].progress, 100);
        assert_eq!(job.phases()[1].progress, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_phase_aborts_run() {
        let backend = SimulatedBackend::new(Duration::from_millis(100), 4);
        let request = request(
            WizardKind::Course,
            CreationMethod::FromDescription,
            GenerationConfig::default(),
        );

        let (reporter, channel) = job_channel();
        let task = backend.spawn(reporter.clone(), &request).unwrap();
        let mut job = GenerationJob::new(request.phases());
        job.start_with(channel.with_task(task.abort_handle())).unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(job.poll().len(), 2);
        assert_eq!(job.phases()[0].progress, 50);

        assert!(job.cancel());
        assert!(reporter.is_cancelled());
        assert!(task.await.unwrap_err().is_cancelled());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(job.poll().is_empty());
        assert_eq!(job.state(), &JobState::Cancelled);
        assert_eq!(job.phases()[0].progress, 50);
    }
}
