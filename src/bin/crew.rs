//! `crew` command line binary.
//!
//! Loads a YAML pipeline, plans it into dependency waves, and runs it against
//! a reasoning engine.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Tracing filter (default: "info,crewai_pipeline=debug" with
//!   `--verbose`, "warn,crewai_pipeline=info" otherwise)
//! - `CREW_ENGINE` - Default engine: "echo" or "openai"
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL_NAME` - OpenAI engine
//!
//! # Usage
//!
//! ```bash
//! crew plan demos/job_prep.yaml
//! crew run demos/job_prep.yaml -i job_posting_url=https://x/1 --output json
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crewai_pipeline::cli::{Cli, Commands, EngineKind, OutputFormat};
use crewai_pipeline::llms::{EchoEngine, OpenAIEngine, ReasoningEngine};
use crewai_pipeline::tools::ToolRegistry;
use crewai_pipeline::utilities::config::{Pipeline, PipelineConfig};
use crewai_pipeline::{CrewOutput, TaskStatus};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,crewai_pipeline=debug"
    } else {
        "warn,crewai_pipeline=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_pipeline(path: &Path) -> Result<Pipeline> {
    let config = PipelineConfig::from_file(path)?;
    config
        .into_pipeline(ToolRegistry::new())
        .with_context(|| format!("failed to build pipeline from {}", path.display()))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Plan { pipeline } => {
            let pipeline = load_pipeline(&pipeline)?;
            let crew = pipeline.into_crew(Arc::new(EchoEngine::default()));
            let plan = crew.plan()?;
            for (n, wave) in plan.waves().iter().enumerate() {
                let ids: Vec<&str> = wave.iter().map(|id| id.as_str()).collect();
                println!("wave {}: {}", n, ids.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            pipeline,
            inputs,
            engine,
            output,
            output_dir,
            timeout,
            process,
            failure_policy,
        } => {
            let mut pipeline = load_pipeline(&pipeline)?;
            pipeline.inputs.extend(inputs);
            if let Some(dir) = output_dir {
                pipeline.settings.output_dir = Some(dir);
            }
            if let Some(secs) = timeout {
                pipeline.settings.task_timeout_secs = Some(secs);
            }
            if let Some(process) = process {
                pipeline.settings.process = process.into();
            }
            if let Some(policy) = failure_policy {
                pipeline.settings.failure_policy = policy.into();
            }

            let engine: Arc<dyn ReasoningEngine> = match engine {
                EngineKind::Echo => Arc::new(EchoEngine::default()),
                EngineKind::Openai => Arc::new(
                    OpenAIEngine::from_env().context("failed to configure OpenAI engine")?,
                ),
            };
            tracing::info!(
                engine = ?engine,
                timeout = ?pipeline.settings.task_timeout_secs.map(Duration::from_secs),
                "Starting run"
            );

            let inputs = pipeline.inputs.clone();
            let crew = pipeline.into_crew(engine);
            let result = crew.kickoff(&inputs).await?;

            match output {
                OutputFormat::Json => println!("{}", result.to_json()?),
                OutputFormat::Text => print_text(&result),
            }

            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn print_text(output: &CrewOutput) {
    for result in &output.tasks_output {
        match result.status {
            TaskStatus::Succeeded => {
                let path = result.output.as_ref().and_then(|o| o.output_file.as_ref());
                match path {
                    Some(path) => println!("[ok]      {} -> {}", result.task_id, path.display()),
                    None => println!("[ok]      {}", result.task_id),
                }
            }
            TaskStatus::Failed => println!(
                "[failed]  {}: {}",
                result.task_id,
                result.error.as_ref().map(ToString::to_string).unwrap_or_default()
            ),
            TaskStatus::Skipped => println!(
                "[skipped] {} (blocked by {})",
                result.task_id,
                result.blocked_by.as_ref().map(|id| id.as_str()).unwrap_or("?")
            ),
            TaskStatus::Pending | TaskStatus::Running => {
                println!("[{}] {}", result.status, result.task_id)
            }
        }
    }
    if !output.raw.is_empty() {
        println!("\n{}", output.raw);
    }
}
