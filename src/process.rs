//! Process and failure-policy types for crew execution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the tasks of one wave are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// Tasks run one after another in declaration order. Contiguous tasks
    /// marked `async_execution` run concurrently as a batch.
    Sequential,
    /// Every task of a wave runs concurrently.
    Parallel,
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Process::Sequential => write!(f, "sequential"),
            Process::Parallel => write!(f, "parallel"),
        }
    }
}

impl Default for Process {
    fn default() -> Self {
        Process::Sequential
    }
}

/// What happens to the rest of a run after a task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Tasks already running finish; every task not yet started is skipped.
    AbortRun,
    /// Only tasks that transitively depend on the failed task are skipped.
    ContinueIndependent,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::AbortRun => write!(f, "abort_run"),
            FailurePolicy::ContinueIndependent => write!(f, "continue_independent"),
        }
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::AbortRun
    }
}
