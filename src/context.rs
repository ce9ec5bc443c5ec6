//! Execution context shared across one run.
//!
//! `ExecutionContext` accumulates the output of every successful task.
//! `UpstreamContext` is the slice of it a single task is allowed to see: the
//! outputs of exactly its declared dependencies, in declaration order.

use std::collections::HashMap;

use crate::task::TaskId;

/// Inputs supplied once per run and substituted into every task template.
pub type RunInputs = HashMap<String, String>;

/// Separator placed between upstream outputs when they are flattened into a
/// single prompt section.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Append-only map from task id to that task's output text.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    outputs: HashMap<TaskId, String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the output of a completed task.
    ///
    /// Returns `false` and keeps the existing entry if `task_id` was already
    /// recorded.
    pub fn insert(&mut self, task_id: TaskId, output: impl Into<String>) -> bool {
        if self.outputs.contains_key(&task_id) {
            log::warn!(
                "Ignoring second output for task '{}': context entries are append-only",
                task_id
            );
            return false;
        }
        self.outputs.insert(task_id, output.into());
        true
    }

    pub fn get(&self, task_id: &str) -> Option<&str> {
        self.outputs.get(task_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Outputs of `dependencies` only, in the order given. Missing entries are
    /// omitted.
    pub fn scoped(&self, dependencies: &[TaskId]) -> UpstreamContext {
        let entries = dependencies
            .iter()
            .filter_map(|id| {
                self.outputs
                    .get(id)
                    .map(|output| (id.clone(), output.clone()))
            })
            .collect();
        UpstreamContext { entries }
    }
}

/// Outputs of a task's declared dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamContext {
    entries: Vec<(TaskId, String)>,
}

impl UpstreamContext {
    pub fn get(&self, task_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == task_id)
            .map(|(_, output)| output.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &str)> {
        self.entries.iter().map(|(id, output)| (id, output.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `## <task id>` section per output, joined with `CONTEXT_SEPARATOR`.
    pub fn flatten(&self) -> String {
        self.entries
            .iter()
            .map(|(id, output)| format!("## {}\n{}", id, output))
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_append_only() {
        let mut ctx = ExecutionContext::new();
        assert!(ctx.insert(TaskId::from("research"), "first"));
        assert!(!ctx.insert(TaskId::from("research"), "second"));
        assert_eq!(ctx.get("research"), Some("first"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_scoped_returns_only_declared_dependencies() {
        let mut ctx = ExecutionContext::new();
        ctx.insert(TaskId::from("research"), "requirements");
        ctx.insert(TaskId::from("profile"), "profile");
        ctx.insert(TaskId::from("unrelated"), "noise");

        let scoped = ctx.scoped(&[TaskId::from("profile"), TaskId::from("research")]);
        assert_eq!(scoped.len(), 2);
        assert_eq!(scoped.get("research"), Some("requirements"));
        assert!(scoped.get("unrelated").is_none());

        let order: Vec<&str> = scoped.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["profile", "research"]);
        assert_eq!(
            scoped.flatten(),
            "## profile\nprofile\n\n---\n\n## research\nrequirements"
        );
    }

    #[test]
    fn test_scoped_with_no_dependencies_is_empty() {
        let mut ctx = ExecutionContext::new();
        ctx.insert(TaskId::from("research"), "requirements");
        assert!(ctx.scoped(&[]).is_empty());
    }
}
