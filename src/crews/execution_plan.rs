//! Dependency planning for a crew's tasks.
//!
//! Resolves task dependencies into execution waves using Kahn's algorithm:
//! - Wave 0: tasks with no dependencies.
//! - Wave N: tasks whose dependencies all sit in waves 0..N-1.
//!
//! Tasks within the same wave are independent of each other. Within a wave,
//! tasks keep their declaration order.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::task::{Task, TaskId};
use crate::utilities::errors::InvalidPipelineError;

/// Ordered execution waves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    waves: Vec<Vec<TaskId>>,
}

impl ExecutionPlan {
    /// Validate the task graph and resolve it into waves.
    pub fn build(tasks: &[Task]) -> Result<Self, InvalidPipelineError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.as_str(), i).is_some() {
                return Err(InvalidPipelineError::DuplicateTask(task.id.clone()));
            }
        }

        // deps[i] = distinct declaration indices task i depends on.
        let mut deps: Vec<Vec<usize>> = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut seen = HashSet::new();
            let mut resolved = Vec::new();
            for dep in &task.context {
                let j = *index.get(dep.as_str()).ok_or_else(|| {
                    InvalidPipelineError::UnknownDependency {
                        task: task.id.clone(),
                        dependency: dep.clone(),
                    }
                })?;
                if seen.insert(j) {
                    resolved.push(j);
                }
            }
            deps.push(resolved);
        }

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut in_degree: Vec<usize> = deps.iter().map(Vec::len).collect();
        for (i, task_deps) in deps.iter().enumerate() {
            for &j in task_deps {
                dependents[j].push(i);
            }
        }

        let mut placed = vec![false; tasks.len()];
        let mut ready: Vec<usize> = (0..tasks.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut waves = Vec::new();

        while !ready.is_empty() {
            ready.sort_unstable();
            let mut next = Vec::new();
            for &i in &ready {
                placed[i] = true;
                for &d in &dependents[i] {
                    in_degree[d] -= 1;
                    if in_degree[d] == 0 {
                        next.push(d);
                    }
                }
            }
            waves.push(ready.iter().map(|&i| tasks[i].id.clone()).collect());
            ready = next;
        }

        if let Some(start) = placed.iter().position(|p| !p) {
            return Err(InvalidPipelineError::Cycle {
                tasks: find_cycle(start, &deps, &placed)
                    .into_iter()
                    .map(|i| tasks[i].id.clone())
                    .collect(),
            });
        }

        Ok(Self { waves })
    }

    pub fn waves(&self) -> &[Vec<TaskId>] {
        &self.waves
    }

    /// Number of waves.
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

/// Walk unplaced dependencies from `start` until a node repeats. Every
/// unplaced node has at least one unplaced dependency, so the walk always
/// closes a cycle. Returns the cycle's indices in declaration order.
fn find_cycle(start: usize, deps: &[Vec<usize>], placed: &[bool]) -> Vec<usize> {
    let mut path = Vec::new();
    let mut on_path: HashMap<usize, usize> = HashMap::new();
    let mut current = start;

    loop {
        if let Some(&pos) = on_path.get(&current) {
            let mut cycle = path.split_off(pos);
            cycle.sort_unstable();
            return cycle;
        }
        on_path.insert(current, path.len());
        path.push(current);
        match deps[current].iter().find(|&&j| !placed[j]) {
            Some(&j) => current = j,
            None => return path,
        }
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let waves = self
            .waves
            .iter()
            .map(|wave| {
                format!(
                    "{{{}}}",
                    wave.iter().map(TaskId::as_str).collect::<Vec<_>>().join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{}]", waves)
    }
}
