//! Error types for pipeline construction and task execution.
//!
//! Pre-execution errors (`InvalidPipelineError`, `UnresolvedPlaceholderError`)
//! abort a run before any task starts and are surfaced through `CrewError`.
//! Per-task errors (`TaskExecutionError`) are recorded in the task's
//! `TaskResult` and never escape `Crew::kickoff`.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::llms::base_llm::ReasoningError;
use crate::task::TaskId;

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn task_suffix(task: &Option<TaskId>) -> String {
    match task {
        Some(id) => format!(" in task '{}'", id),
        None => String::new(),
    }
}

/// The task graph or agent registry is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPipelineError {
    /// A task lists a dependency that is not declared in the pipeline.
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    /// The dependency relation contains a cycle (self-dependency included).
    #[error("circular dependency detected between tasks: {}", join_ids(.tasks))]
    Cycle { tasks: Vec<TaskId> },

    /// Two tasks share the same id.
    #[error("task id '{0}' is declared more than once")]
    DuplicateTask(TaskId),

    /// A task is owned by an agent role that is not registered.
    #[error("task '{task}' is assigned to unknown agent '{agent}'")]
    UnknownAgent { task: TaskId, agent: String },

    /// Two agents share the same role.
    #[error("agent role '{0}' is declared more than once")]
    DuplicateAgent(String),
}

/// A template references a placeholder with no matching input and no default.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("unresolved placeholder '{{{}}}'{}", .placeholder, task_suffix(.task))]
pub struct UnresolvedPlaceholderError {
    /// Name of the missing placeholder.
    pub placeholder: String,
    /// Task whose template failed to render, when known.
    pub task: Option<TaskId>,
}

impl UnresolvedPlaceholderError {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            task: None,
        }
    }

    /// Attach the id of the task whose template failed.
    pub fn in_task(mut self, task: &TaskId) -> Self {
        self.task = Some(task.clone());
        self
    }
}

/// Failure of a single task. Stored in the task's `TaskResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskExecutionError {
    /// The reasoning engine returned an error.
    #[error("reasoning engine failed: {message}")]
    Reasoning { message: String },

    /// A tool invoked by the reasoning engine failed and was not recovered.
    #[error("tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    /// The task did not finish before its deadline.
    #[error("task timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// The output artifact could not be written.
    #[error("failed to write output to '{}': {message}", .path.display())]
    Persistence { path: PathBuf, message: String },

    /// The task's template could not be rendered.
    #[error(transparent)]
    Template(#[from] UnresolvedPlaceholderError),
}

impl From<ReasoningError> for TaskExecutionError {
    fn from(err: ReasoningError) -> Self {
        match err {
            ReasoningError::Tool { tool, source } => Self::Tool {
                tool,
                message: source.to_string(),
            },
            other => Self::Reasoning {
                message: other.to_string(),
            },
        }
    }
}

/// Errors that stop a run before any task executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrewError {
    #[error(transparent)]
    InvalidPipeline(#[from] InvalidPipelineError),

    #[error(transparent)]
    UnresolvedPlaceholder(#[from] UnresolvedPlaceholderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::base_tool::ToolError;

    #[test]
    fn test_cycle_error_names_every_task() {
        let err = InvalidPipelineError::Cycle {
            tasks: vec![TaskId::from("a"), TaskId::from("b")],
        };
        assert_eq!(
            err.to_string(),
            "circular dependency detected between tasks: a, b"
        );
    }

    #[test]
    fn test_placeholder_error_display() {
        let err = UnresolvedPlaceholderError::new("github_url");
        assert_eq!(err.to_string(), "unresolved placeholder '{github_url}'");

        let err = err.in_task(&TaskId::from("profile"));
        assert_eq!(
            err.to_string(),
            "unresolved placeholder '{github_url}' in task 'profile'"
        );
    }

    #[test]
    fn test_reasoning_tool_error_maps_to_tool_variant() {
        let err = ReasoningError::Tool {
            tool: "read_resume".to_string(),
            source: ToolError::Failed("disk on fire".to_string()),
        };
        let task_err = TaskExecutionError::from(err);
        assert_eq!(
            task_err,
            TaskExecutionError::Tool {
                tool: "read_resume".to_string(),
                message: "disk on fire".to_string(),
            }
        );
    }

    #[test]
    fn test_task_error_serializes_with_kind_tag() {
        let err = TaskExecutionError::Reasoning {
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "reasoning");
        assert_eq!(json["message"], "boom");
    }
}
