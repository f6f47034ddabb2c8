use super::{print_block, project, save};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use coursecraft_editor::{
    BlockId, BlockKind, CourseStore, EditSession, FileCourseStore, Mutation, MutationOutcome,
};

#[derive(Subcommand, Debug)]
pub enum BlocksCommand {
    /// List stored courses
    Courses,

    /// List the blocks of a course in display order
    List {
        course: String,
    },

    /// Show the available block types
    Types,

    /// Add a block with default content
    Add {
        course: String,

        /// Block type (text, quiz, matching-game, ...)
        kind: BlockKind,

        /// Insert at this position instead of appending
        #[arg(long)]
        at: Option<usize>,
    },

    /// Remove a block
    Remove {
        course: String,
        block_id: String,
    },

    /// Move a block to a position
    Move {
        course: String,
        block_id: String,
        index: usize,
    },

    /// Drag a block onto another block's position
    Drag {
        course: String,
        source: String,
        target: String,
    },

    /// Set the page title
    Title {
        course: String,
        title: String,
    },
}

pub fn blocks(command: BlocksCommand, cwd: &str) -> Result<()> {
    let (_, store) = project(cwd)?;

    let (course, mutation) = match command {
        BlocksCommand::Courses => {
            let courses = store.list_courses()?;
            if courses.is_empty() {
                println!("No courses in {}", store.root().display());
            }
            for course in courses {
                println!(
                    "  {:<24} {:<40} {} blocks",
                    course.course_id.bright_white(),
                    course.title,
                    course.block_count
                );
            }
            return Ok(());
        }
        BlocksCommand::Types => {
            for kind in BlockKind::ALL {
                println!("  {:<22} {}", kind.to_string().cyan(), kind.label());
            }
            return Ok(());
        }
        BlocksCommand::List { course } => {
            let session = EditSession::try_open("cli", &store, &course)?;
            let doc = session.document();
            println!(
                "{} {} (version {})",
                "📄".bright_blue(),
                doc.title().bold(),
                doc.version()
            );
            for (index, block) in doc.blocks().iter().enumerate() {
                print_block(index, block);
            }
            return Ok(());
        }
        BlocksCommand::Drag { course, source, target } => {
            return drag(&store, &course, BlockId::new(source), BlockId::new(target));
        }
        BlocksCommand::Add { course, kind, at } => {
            let mutation = match at {
                Some(index) => Mutation::InsertBlock {
                    kind,
                    content: None,
                    index,
                },
                None => Mutation::AddBlock { kind, content: None },
            };
            (course, mutation)
        }
        BlocksCommand::Remove { course, block_id } => (
            course,
            Mutation::RemoveBlock {
                block_id: BlockId::new(block_id),
            },
        ),
        BlocksCommand::Move {
            course,
            block_id,
            index,
        } => (
            course,
            Mutation::Reorder {
                block_id: BlockId::new(block_id),
                target_index: index,
            },
        ),
        BlocksCommand::Title { course, title } => (course, Mutation::SetTitle { title }),
    };

    let mut session = EditSession::open("cli", &store, &course);
    let result = session.apply(mutation)?;
    describe(&result.outcome);

    if result.outcome != MutationOutcome::Unchanged {
        save(&mut session, &store)?;
    }
    Ok(())
}

fn drag(store: &FileCourseStore, course: &str, source: BlockId, target: BlockId) -> Result<()> {
    let mut session = EditSession::try_open("cli", store, course)?;

    session.begin_drag(&source)?;
    let indicator = session
        .hover_drag(&target)
        .ok_or_else(|| anyhow!("Cannot drop {} on {}", source, target))?;
    println!("  Dropping {} at position {}", source, indicator.target_index);

    let outcome = session.drop_on(&target)?;
    describe(&outcome);

    if outcome != MutationOutcome::Unchanged {
        save(&mut session, store)?;
    }
    Ok(())
}

fn describe(outcome: &MutationOutcome) {
    match outcome {
        MutationOutcome::Added(id) => println!("  {} Added block {}", "✓".green(), id),
        MutationOutcome::Removed(id) => println!("  {} Removed block {}", "✓".green(), id),
        MutationOutcome::Updated(id) => println!("  {} Updated block {}", "✓".green(), id),
        MutationOutcome::Moved { block_id, from, to } => {
            println!("  {} Moved {} from {} to {}", "✓".green(), block_id, from, to)
        }
        MutationOutcome::TitleChanged => println!("  {} Title updated", "✓".green()),
        MutationOutcome::Unchanged => println!("  {} Nothing to change", "•".dimmed()),
    }
}
