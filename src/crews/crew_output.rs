//! Crew output representation.
//!
//! Represents the result of one run: the execution plan, every task's
//! result in declaration order, and the final raw output.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::execution_plan::ExecutionPlan;
use crate::tasks::task_result::{TaskResult, TaskStatus};

/// The result of a crew run.
///
/// # Fields
///
/// * `crew_id` - Id of the crew that produced this output.
/// * `plan` - Waves the tasks were scheduled in.
/// * `raw` - Raw output of the last succeeded task in declaration order.
/// * `tasks_output` - Result of every task, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub crew_id: Uuid,
    pub plan: ExecutionPlan,
    pub raw: String,
    pub tasks_output: Vec<TaskResult>,
}

impl CrewOutput {
    pub fn new(crew_id: Uuid, plan: ExecutionPlan, tasks_output: Vec<TaskResult>) -> Self {
        let raw = tasks_output
            .iter()
            .rev()
            .find_map(TaskResult::raw)
            .unwrap_or_default()
            .to_string();
        Self {
            crew_id,
            plan,
            raw,
            tasks_output,
        }
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskResult> {
        self.tasks_output
            .iter()
            .find(|r| r.task_id.as_str() == task_id)
    }

    /// Results keyed by task id.
    pub fn results(&self) -> HashMap<&str, &TaskResult> {
        self.tasks_output
            .iter()
            .map(|r| (r.task_id.as_str(), r))
            .collect()
    }

    /// True when every task succeeded.
    pub fn is_success(&self) -> bool {
        self.tasks_output.iter().all(TaskResult::is_succeeded)
    }

    fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &TaskResult> {
        self.tasks_output.iter().filter(move |r| r.status == status)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TaskResult> {
        self.with_status(TaskStatus::Succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskResult> {
        self.with_status(TaskStatus::Failed)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TaskResult> {
        self.with_status(TaskStatus::Skipped)
    }

    /// Pretty JSON of the whole output.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use crate::tasks::task_output::TaskOutput;
    use crate::utilities::errors::TaskExecutionError;

    fn output() -> CrewOutput {
        let ok = |id: &str, raw: &str| {
            TaskResult::pending(TaskId::from(id), "A")
                .start()
                .succeed(TaskOutput::new("d", "e", "A", raw))
        };
        let failed = TaskResult::pending(TaskId::from("strategy"), "A")
            .start()
            .fail(TaskExecutionError::Reasoning {
                message: "boom".to_string(),
            });
        let skipped = TaskResult::pending(TaskId::from("prep"), "A").skip(TaskId::from("strategy"));
        CrewOutput::new(
            Uuid::new_v4(),
            ExecutionPlan::default(),
            vec![ok("research", "r"), ok("profile", "p"), failed, skipped],
        )
    }

    #[test]
    fn test_raw_is_last_succeeded_output() {
        let out = output();
        assert_eq!(out.raw, "p");
        assert_eq!(out.to_string(), "p");
        assert!(!out.is_success());
    }

    #[test]
    fn test_status_views() {
        let out = output();
        assert_eq!(out.succeeded().count(), 2);
        assert_eq!(out.failed().next().unwrap().task_id.as_str(), "strategy");
        assert_eq!(
            out.skipped().next().unwrap().blocked_by,
            Some(TaskId::from("strategy"))
        );
        assert_eq!(out.results().len(), 4);
        assert_eq!(out.get("research").and_then(TaskResult::raw), Some("r"));
    }

    #[test]
    fn test_json_contains_statuses() {
        let json: serde_json::Value = serde_json::from_str(&output().to_json().unwrap()).unwrap();
        assert_eq!(json["tasks_output"][2]["status"], "failed");
        assert_eq!(json["tasks_output"][2]["error"]["kind"], "reasoning");
        assert_eq!(json["tasks_output"][3]["status"], "skipped");
    }
}
