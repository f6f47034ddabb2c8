use super::{print_block, project, save};
use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;
use coursecraft_editor::EditSession;
use coursecraft_generation::{
    CreationMethod, Draft, InputFields, InteractionType, JobUpdate, QuestionType, SimulatedBackend,
    Tone, WizardKind, WizardSession, WizardStep,
};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// What to generate (course, quiz, interaction)
    pub kind: WizardKind,

    /// Course that receives the accepted content
    #[arg(long)]
    pub course: String,

    /// Build from an uploaded PDF
    #[arg(long)]
    pub file: Option<String>,

    /// Build from the knowledge base
    #[arg(long)]
    pub knowledge_base: bool,

    /// Existing content sections to build a quiz from
    #[arg(long = "section")]
    pub sections: Vec<String>,

    /// Interaction type (timeline, matching-game, flashcards, poll, scenario, knowledge-check)
    #[arg(long)]
    pub interaction: Option<InteractionType>,

    #[arg(long, default_value = "")]
    pub focus: String,

    #[arg(long, default_value = "")]
    pub audience: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub tone: Option<Tone>,

    /// Number of quiz questions
    #[arg(long)]
    pub questions: Option<u8>,

    /// Number of feedback questions
    #[arg(long)]
    pub feedback: Option<u8>,

    /// Question types to use (repeatable)
    #[arg(long = "question-type")]
    pub question_types: Vec<QuestionType>,

    #[arg(long)]
    pub timeline: bool,

    #[arg(long)]
    pub matching: bool,

    #[arg(long)]
    pub images: bool,

    /// Pick one of the suggested course titles
    #[arg(long)]
    pub title_index: Option<usize>,

    /// Print the draft instead of adding it to the course
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    fn method(&self) -> Result<CreationMethod> {
        if let Some(interaction) = self.interaction {
            return Ok(CreationMethod::Interactive { interaction });
        }
        if let Some(file_name) = &self.file {
            return Ok(CreationMethod::FromUpload {
                file_name: file_name.clone(),
            });
        }
        if self.knowledge_base {
            return Ok(CreationMethod::FromKnowledgeBase);
        }
        match self.kind {
            WizardKind::Course => Ok(CreationMethod::FromDescription),
            WizardKind::Quiz => Ok(CreationMethod::FromExistingContent {
                sections: self.sections.clone(),
            }),
            WizardKind::Interaction => Err(anyhow!("--interaction is required")),
        }
    }

    fn input(&self) -> InputFields {
        InputFields {
            focus: self.focus.clone(),
            target_audience: self.audience.clone(),
            description: self.description.clone(),
            profession: String::new(),
        }
    }
}

pub async fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let (config, store) = project(cwd)?;

    let mut generation = config.generation_config(args.kind);
    if let Some(language) = &args.language {
        generation.language = language.clone();
    }
    if let Some(tone) = args.tone {
        generation.tone = tone;
    }
    if let Some(questions) = args.questions {
        generation.quiz_questions = questions;
    }
    if let Some(feedback) = args.feedback {
        generation.feedback_questions = feedback;
    }
    if !args.question_types.is_empty() {
        generation.question_types = args.question_types.clone();
    }
    generation.include_timeline |= args.timeline;
    generation.include_matching_game |= args.matching;
    generation.generate_images |= args.images;

    let backend = SimulatedBackend::new(
        config.simulation.step_delay(),
        config.simulation.steps_per_phase,
    );
    let mut wizard = WizardSession::new(args.kind, backend);

    println!("✨ {} {} wizard", "Starting".green().bold(), args.kind);
    wizard.choose(args.method()?)?;
    wizard.submit(args.input())?;
    let job = wizard.start_generation(generation)?;
    let phases = job.phases().len();
    tracing::info!("generation job {} started with {} phases", job.id(), phases);

    loop {
        for update in wizard.poll() {
            print_update(&update, phases);
        }
        if wizard.step() == WizardStep::Review {
            break;
        }
        if let Some(reason) = wizard.failure() {
            tracing::warn!("{} generation failed: {}", args.kind, reason);
            bail!("Generation failed: {}", reason);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    if let (Some(index), Some(draft)) = (args.title_index, wizard.draft_mut()) {
        draft.as_course_mut()?.select_title(index)?;
    }

    let draft = wizard
        .result()
        .ok_or_else(|| anyhow!("Generation finished without a draft"))?;
    print_draft(draft);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(draft)?);
        wizard.abandon();
        return Ok(());
    }

    let mut session = EditSession::open("cli", &store, &args.course);
    let added = wizard.accept(session.document_mut())?;
    println!();
    println!("  {} Added {} blocks", "✓".green(), added.len());
    for (index, block) in session.document().blocks().iter().enumerate() {
        if added.contains(block.id()) {
            print_block(index, block);
        }
    }
    save(&mut session, &store)
}

fn print_update(update: &JobUpdate, phases: usize) {
    match update {
        JobUpdate::Progress { phase, name, progress } => println!(
            "  [{}/{}] {:<32} {:>3}%",
            phase + 1,
            phases,
            name,
            progress
        ),
        JobUpdate::Succeeded => println!("  {} Generation complete", "✓".green()),
        JobUpdate::Failed(reason) => println!("  {} {}", "✗".red(), reason),
    }
}

fn print_draft(draft: &Draft) {
    println!();
    match draft {
        Draft::Course(course) => {
            for (index, title) in course.titles.iter().enumerate() {
                let marker = if course.selected_title == Some(index) { "●" } else { "○" };
                println!("  {} {}", marker.bright_blue(), title);
            }
            println!("  {}", course.summary.dimmed());
            for section in &course.sections {
                println!("  {} {}", "§".bright_blue(), section.title.bold());
                for page in &section.pages {
                    println!("      - {}", page);
                }
            }
            println!(
                "  {} quiz questions, {} feedback questions",
                course.quiz.len(),
                course.feedback.len()
            );
        }
        Draft::Quiz(quiz) => {
            println!("  {}", quiz.title.bold());
            for question in &quiz.questions {
                println!("  - [{}] {}", question.question_type, question.question);
            }
        }
        Draft::Interaction(interaction) => {
            println!("  {}", interaction.title.bold());
            for content in &interaction.blocks {
                println!("  - {}", content.kind());
            }
        }
    }
}
