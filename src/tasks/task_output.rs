//! Task output representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The output of a successfully executed task.
///
/// # Fields
///
/// * `description` - Rendered description of the task
/// * `expected_output` - Rendered expected output of the task
/// * `summary` - First ten words of the description
/// * `raw` - Raw output returned by the reasoning engine
/// * `agent` - Role of the agent that executed the task
/// * `output_file` - Where the output was written, if anywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Rendered description of the task.
    pub description: String,
    /// Rendered expected output of the task.
    pub expected_output: String,
    /// Summary of the task (auto-generated from description).
    pub summary: String,
    /// Raw output of the task.
    pub raw: String,
    /// Agent that executed the task.
    pub agent: String,
    /// Output file the raw output was persisted to.
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

impl TaskOutput {
    /// Create a new TaskOutput with summary auto-generated from description.
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let summary = Self::generate_summary(&description);
        Self {
            description,
            expected_output: expected_output.into(),
            summary,
            raw: raw.into(),
            agent: agent.into(),
            output_file: None,
        }
    }

    pub fn with_output_file(mut self, output_file: Option<PathBuf>) -> Self {
        self.output_file = output_file;
        self
    }

    /// Generate a summary from the description (first 10 words + "...").
    fn generate_summary(description: &str) -> String {
        let excerpt: String = description
            .split_whitespace()
            .take(10)
            .collect::<Vec<&str>>()
            .join(" ");
        format!("{}...", excerpt)
    }
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
