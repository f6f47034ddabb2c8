use super::{project, save};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use coursecraft_editor::{BlockId, EditSession};
use coursecraft_generation::{TextTransformPipeline, Tone, TransformAction, TransformRequest};

#[derive(Args, Debug)]
pub struct TransformArgs {
    pub course: String,

    pub block_id: String,

    /// improve, shorten, lengthen, simplify, summarize, complete,
    /// paraphrase, adjust-tone, fix-grammar, translate
    pub action: TransformAction,

    #[arg(long)]
    pub tone: Option<Tone>,

    /// Target language for translate
    #[arg(long)]
    pub language: Option<String>,

    /// Write the result into the block and save
    #[arg(long)]
    pub apply: bool,
}

pub async fn transform(args: TransformArgs, cwd: &str) -> Result<()> {
    let (config, store) = project(cwd)?;
    let mut session = EditSession::try_open("cli", &store, &args.course)?;
    let block_id = BlockId::new(args.block_id.as_str());

    let input = session
        .document()
        .get(&block_id)
        .ok_or_else(|| anyhow!("Block not found: {}", block_id))?
        .content()
        .primary_text()
        .ok_or_else(|| anyhow!("Block {} has no text to transform", block_id))?
        .to_string();

    let request = TransformRequest::new(args.action, input)
        .with_tone(args.tone.unwrap_or(config.tone))
        .with_language(args.language.unwrap_or(config.language));

    tracing::info!("transforming {} in {} with {}", block_id, args.course, args.action);
    let mut pipeline = TextTransformPipeline::default();
    pipeline.request_with(request)?;
    let candidate = pipeline.wait().await?;

    println!("{} {}", "✨".bright_blue(), args.action.label().bold());
    println!("  {}", candidate.text);

    if !args.apply {
        pipeline.discard();
        println!();
        println!("Run again with --apply to update the block");
        return Ok(());
    }

    pipeline.apply(session.document_mut(), &block_id)?;
    println!("  {} Updated block {}", "✓".green(), block_id);
    save(&mut session, &store)
}
