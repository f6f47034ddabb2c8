use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for course files
    #[arg(short, long, default_value = "courses")]
    pub courses_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Coursecraft project...".bright_blue().bold());

    let courses_dir = PathBuf::from(cwd).join(&args.courses_dir);
    if !courses_dir.exists() {
        fs::create_dir_all(&courses_dir)?;
        println!("  {} Created {}/", "✓".green(), args.courses_dir);
    }

    let config = Config {
        courses_dir: args.courses_dir.clone(),
        ..Config::default()
    };
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: coursecraft blocks add my-course text");
    println!("  2. Run: coursecraft generate course --course my-course --focus \"Your topic\"");
    println!("  3. Check {}/my-course.json", args.courses_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                courses_dir: "lessons".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.courses_dir, "lessons");
        assert!(dir.path().join("lessons").is_dir());

        // without --force the existing file is kept
        init(
            InitArgs {
                courses_dir: "other".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(Config::load(&cwd).unwrap().courses_dir, "lessons");
    }
}
