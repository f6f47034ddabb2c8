pub mod blocks;
pub mod generate;
pub mod init;
pub mod transform;

pub use blocks::{blocks, BlocksCommand};
pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use transform::{transform, TransformArgs};

use crate::config::Config;
use anyhow::{bail, Result};
use colored::Colorize;
use coursecraft_editor::{Block, EditSession, FileCourseStore, SaveStatus};

/// Config and file store for the project in `cwd`
fn project(cwd: &str) -> Result<(Config, FileCourseStore)> {
    let config = Config::load(cwd)?;
    let store = FileCourseStore::new(config.get_courses_dir(cwd));
    Ok((config, store))
}

fn save(session: &mut EditSession, store: &FileCourseStore) -> Result<()> {
    match session.save(store) {
        SaveStatus::Saved { version } => {
            println!(
                "  {} Saved {} (version {})",
                "✓".green(),
                session.document().course_id().bright_white(),
                version
            );
            Ok(())
        }
        SaveStatus::Failed(reason) => bail!("Could not save course: {}", reason),
        SaveStatus::Disabled => {
            tracing::warn!("save skipped for course {}", session.document().course_id());
            bail!("Saving is disabled after a failed save")
        }
    }
}

fn print_block(index: usize, block: &Block) {
    let text = block.content().primary_text().unwrap_or("");
    let text = if text.chars().count() > 48 {
        format!("{}…", text.chars().take(47).collect::<String>())
    } else {
        text.to_string()
    };
    println!(
        "  {:>3}  {:<22} {:<20} {}",
        index,
        block.id().to_string().dimmed(),
        block.kind().to_string().cyan(),
        text
    );
}
