//! Blueprint CLI
//!
//! Runs the planner → architect → coder pipeline from the terminal and
//! renders its progress events.

use anyhow::{Context, Result};
use blueprint_core::config::{ConfigOverrides, PipelineConfig};
use blueprint_core::models::LlmProvider;
use blueprint_core::swarm::{Coordinator, PipelineEvent, PipelineEventKind};
use blueprint_core::tools::ProjectTools;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 20;

#[derive(Parser)]
#[command(author, version, about = "Blueprint - turn a one-line request into a project")]
struct Args {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the pipeline on a request
    Run {
        /// What to build. Read from stdin when omitted
        prompt: Option<String>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print the generated project tree
    Tree {
        /// Levels to descend
        #[arg(short, long, default_value_t = 2)]
        depth: usize,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(ClapArgs)]
struct OverrideArgs {
    /// LLM provider (anthropic, openai, gemini, openrouter, grok, deepseek)
    #[arg(long)]
    provider: Option<LlmProvider>,
    /// Model name
    #[arg(long)]
    model: Option<String>,
    /// Base URL for OpenAI-compatible endpoints
    #[arg(long)]
    base_url: Option<String>,
    /// Directory generated files are written to
    #[arg(long)]
    project_root: Option<PathBuf>,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl OverrideArgs {
    fn load(self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::load(self.config.as_deref())?;
        config.merge(ConfigOverrides {
            project_root: self.project_root,
            provider: self.provider,
            model: self.model,
            base_url: self.base_url,
            command_timeout_secs: None,
        });
        Ok(config)
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn render(event: &PipelineEvent) {
    let detail = event.message.as_deref().unwrap_or("");
    match event.kind {
        PipelineEventKind::PipelineStarted => println!("🚀 Pipeline started"),
        PipelineEventKind::AgentStarted => println!("▶ {}", event.agent),
        PipelineEventKind::AgentCompleted => {
            println!("  {} {} done", progress_bar(100), event.agent)
        }
        PipelineEventKind::AgentFailed => eprintln!("❌ {} failed: {}", event.agent, detail),
        PipelineEventKind::StepStarted => {
            println!(
                "  {} {}",
                progress_bar(event.progress.unwrap_or(0)),
                detail
            )
        }
        PipelineEventKind::StepCompleted => {
            println!(
                "  {} ✓ {}",
                progress_bar(event.progress.unwrap_or(0)),
                detail
            )
        }
        PipelineEventKind::PipelineCompleted => println!("✅ Pipeline completed"),
        PipelineEventKind::PipelineFailed => eprintln!("❌ Pipeline failed"),
    }
}

fn read_prompt(prompt: Option<String>) -> Result<String> {
    let prompt = match prompt {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read prompt from stdin")?;
            buf
        }
    };
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        anyhow::bail!("Empty prompt");
    }
    Ok(prompt)
}

async fn run(prompt: Option<String>, overrides: OverrideArgs) -> Result<()> {
    let prompt = read_prompt(prompt)?;
    let config = overrides.load()?;
    tracing::info!(
        provider = config.model.provider.display_name(),
        model = %config.model.model,
        root = %config.project_root.display(),
        "Starting pipeline"
    );

    let (tx, mut rx) = mpsc::channel::<PipelineEvent>(100);
    let renderer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            render(&event);
        }
    });

    let mut coordinator = Coordinator::new(&config).with_event_channel(tx);
    let outcome = coordinator.run(&prompt).await;
    drop(coordinator);
    let _ = renderer.await;

    let result = outcome?;
    println!();
    println!("📦 {}: {}", result.plan.name, result.plan.description);
    println!("   Tech stack: {}", result.plan.techstack);
    println!(
        "   Files: {} of {} tasks implemented",
        result.steps_completed,
        result.task_plan.len()
    );
    println!("   Output: {}", config.project_root.display());
    Ok(())
}

fn tree(depth: usize, overrides: OverrideArgs) -> Result<()> {
    let config = overrides.load()?;
    let tools = ProjectTools::new(&config.project_root);
    println!("{}", tools.print_tree(".", depth)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        CliCommand::Run { prompt, overrides } => run(prompt, overrides).await,
        CliCommand::Tree { depth, overrides } => tree(depth, overrides),
    }
}
