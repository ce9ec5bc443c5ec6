//! Per-task execution record.
//!
//! A `TaskResult` is created `pending` for every task when a run starts and
//! is finalized exactly once: `succeeded` with an output, `failed` with an
//! error, or `skipped` when an upstream failure prevents it from running.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task_output::TaskOutput;
use crate::task::TaskId;
use crate::utilities::errors::TaskExecutionError;

/// Lifecycle status of a task within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of one task in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    /// Role of the owning agent.
    pub agent: String,
    pub status: TaskStatus,
    /// Present iff `status` is `Succeeded`.
    pub output: Option<TaskOutput>,
    /// Present iff `status` is `Failed`.
    pub error: Option<TaskExecutionError>,
    /// The failed or skipped task that caused this one to be skipped.
    pub blocked_by: Option<TaskId>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TaskResult {
    pub fn pending(task_id: TaskId, agent: impl Into<String>) -> Self {
        Self {
            task_id,
            agent: agent.into(),
            status: TaskStatus::Pending,
            output: None,
            error: None,
            blocked_by: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Mark the task as running and stamp its start time.
    pub fn start(mut self) -> Self {
        self.status = TaskStatus::Running;
        self.start_time = Some(Utc::now());
        self
    }

    pub fn succeed(mut self, output: TaskOutput) -> Self {
        self.status = TaskStatus::Succeeded;
        self.output = Some(output);
        self.error = None;
        self.end_time = Some(Utc::now());
        self
    }

    pub fn fail(mut self, error: TaskExecutionError) -> Self {
        self.status = TaskStatus::Failed;
        self.output = None;
        self.error = Some(error);
        self.end_time = Some(Utc::now());
        self
    }

    /// Mark the task as skipped because `blocker` did not succeed.
    pub fn skip(mut self, blocker: TaskId) -> Self {
        self.status = TaskStatus::Skipped;
        self.blocked_by = Some(blocker);
        self
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    /// Raw output text, if the task succeeded.
    pub fn raw(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.raw.as_str())
    }

    /// Get the execution duration in seconds, if both start and end times are set.
    pub fn execution_duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.task_id, self.status)?;
        if let Some(ref error) = self.error {
            write!(f, ": {}", error)?;
        }
        if let Some(ref blocker) = self.blocked_by {
            write!(f, " (blocked by {})", blocker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_lifecycle() {
        let result = TaskResult::pending(TaskId::from("research"), "Researcher").start();
        assert_eq!(result.status, TaskStatus::Running);
        assert!(result.start_time.is_some());

        let result = result.succeed(TaskOutput::new("d", "e", "Researcher", "done"));
        assert!(result.is_succeeded());
        assert_eq!(result.raw(), Some("done"));
        assert!(result.error.is_none());
        assert!(result.execution_duration().unwrap() >= 0.0);
    }

    #[test]
    fn test_failure_has_error_and_no_output() {
        let result = TaskResult::pending(TaskId::from("research"), "Researcher")
            .start()
            .fail(TaskExecutionError::Reasoning {
                message: "no answer".to_string(),
            });
        assert_eq!(result.status, TaskStatus::Failed);
        assert!(result.output.is_none());
        assert_eq!(
            result.to_string(),
            "research [failed]: reasoning engine failed: no answer"
        );
    }

    #[test]
    fn test_skip_records_blocker() {
        let result = TaskResult::pending(TaskId::from("prep"), "Preparer")
            .skip(TaskId::from("strategy"));
        assert_eq!(result.status, TaskStatus::Skipped);
        assert!(result.start_time.is_none());
        assert_eq!(result.to_string(), "prep [skipped] (blocked by strategy)");
    }
}
