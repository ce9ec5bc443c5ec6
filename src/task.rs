//! Task definitions.
//!
//! A `Task` is an immutable unit of work: a description template, an
//! expected-output description, the role of the owning agent, the ids of the
//! upstream tasks whose outputs it consumes, and an optional output file.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::utilities::errors::UnresolvedPlaceholderError;
use crate::utilities::string_utils::interpolate;

/// Stable identity of a task within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id assigned to the task declared at `index` when no explicit id is given.
    pub fn from_index(index: usize) -> Self {
        Self(format!("task_{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn default_true() -> bool {
    true
}

/// Represents a task to be executed by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: TaskId,
    /// Description template; `{placeholder}`s are filled from the run inputs.
    pub description: String,
    /// Clear definition of the expected outcome. Documentation for the
    /// reasoning engine, not mechanically enforced.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    pub agent: String,
    /// Ids of upstream tasks whose outputs this task consumes.
    #[serde(default)]
    pub context: Vec<TaskId>,
    /// File path template for storing the task output.
    #[serde(default)]
    pub output_file: Option<String>,
    /// Whether to create the parent directory of `output_file` if missing.
    #[serde(default = "default_true")]
    pub create_directory: bool,
    /// Hint that the task may run concurrently with its wave siblings.
    #[serde(default)]
    pub async_execution: bool,
}

/// A task's templates rendered against one run's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTask {
    pub description: String,
    pub expected_output: String,
    pub output_file: Option<PathBuf>,
}

impl Task {
    /// Create a new Task with required fields.
    pub fn new(
        id: impl Into<TaskId>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: Vec::new(),
            output_file: None,
            create_directory: true,
            async_execution: false,
        }
    }

    /// Declare the upstream tasks this task depends on.
    pub fn with_context<I, T>(mut self, context: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.context = context.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_file(mut self, output_file: impl Into<String>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    pub fn with_create_directory(mut self, create_directory: bool) -> Self {
        self.create_directory = create_directory;
        self
    }

    pub fn with_async_execution(mut self, async_execution: bool) -> Self {
        self.async_execution = async_execution;
        self
    }

    /// Render description, expected output and output path with `inputs`.
    pub fn render(
        &self,
        inputs: &HashMap<String, String>,
    ) -> Result<RenderedTask, UnresolvedPlaceholderError> {
        let in_task = |e: UnresolvedPlaceholderError| e.in_task(&self.id);
        let description = interpolate(&self.description, inputs).map_err(in_task)?;
        let expected_output = interpolate(&self.expected_output, inputs).map_err(in_task)?;
        let output_file = match self.output_file {
            Some(ref path) => Some(PathBuf::from(interpolate(path, inputs).map_err(in_task)?)),
            None => None,
        };
        Ok(RenderedTask {
            description,
            expected_output,
            output_file,
        })
    }

    /// MD5 of the un-rendered `description|expected_output`.
    pub fn key(&self) -> String {
        let source = format!("{}|{}", self.description, self.expected_output);
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task(id={}, agent={}, context=[{}])",
            self.id,
            self.agent,
            self.context
                .iter()
                .map(TaskId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
