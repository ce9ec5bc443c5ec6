//! Command line interface for the `crew` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::process::{FailurePolicy, Process};

#[derive(Debug, Parser)]
#[command(name = "crew")]
#[command(author, version, long_about = None)]
#[command(about = "Run dependency-aware agent crews from YAML pipelines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format for run results.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Per-task status lines followed by the final output
    #[default]
    Text,
    /// The whole crew output as one JSON object
    Json,
}

/// Reasoning engine backing the run.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum EngineKind {
    /// Deterministic engine echoing each task description
    #[default]
    Echo,
    /// OpenAI-compatible chat completions API
    Openai,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProcessArg {
    Sequential,
    Parallel,
}

impl From<ProcessArg> for Process {
    fn from(arg: ProcessArg) -> Self {
        match arg {
            ProcessArg::Sequential => Process::Sequential,
            ProcessArg::Parallel => Process::Parallel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FailurePolicyArg {
    AbortRun,
    ContinueIndependent,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::AbortRun => FailurePolicy::AbortRun,
            FailurePolicyArg::ContinueIndependent => FailurePolicy::ContinueIndependent,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a pipeline
    Run {
        /// Pipeline definition (YAML)
        pipeline: PathBuf,

        /// Run input as key=value; overrides the pipeline's defaults
        #[arg(short, long = "input", value_parser = parse_key_val)]
        inputs: Vec<(String, String)>,

        #[arg(long, value_enum, default_value = "echo", env = "CREW_ENGINE")]
        engine: EngineKind,

        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Directory relative output files are written under
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Per-task timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[arg(long, value_enum)]
        process: Option<ProcessArg>,

        #[arg(long, value_enum)]
        failure_policy: Option<FailurePolicyArg>,
    },

    /// Validate a pipeline and print its execution waves
    Plan {
        /// Pipeline definition (YAML)
        pipeline: PathBuf,
    },
}

/// Parse a `key=value` pair. The value may contain further `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no '=' in '{}'", s))?;
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
