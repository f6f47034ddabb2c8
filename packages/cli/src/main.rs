mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, generate, init, transform, BlocksCommand, GenerateArgs, InitArgs, TransformArgs,
};
use tracing_subscriber::EnvFilter;

/// Coursecraft CLI - block-based course authoring
#[derive(Parser, Debug)]
#[command(name = "coursecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Coursecraft project
    Init(InitArgs),

    /// Inspect and edit the blocks of a course
    Blocks {
        #[command(subcommand)]
        command: BlocksCommand,
    },

    /// Run a generation wizard and add the result to a course
    Generate(GenerateArgs),

    /// Rewrite the text of a block
    Transform(TransformArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    tracing::debug!("dispatching {:?}", cli.command);
    let result = match std::env::current_dir() {
        Ok(cwd) => {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Blocks { command } => blocks(command, &cwd),
                Command::Generate(args) => generate(args, &cwd).await,
                Command::Transform(args) => transform(args, &cwd).await,
            }
        }
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
