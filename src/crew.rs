//! Main Crew struct.
//!
//! A `Crew` owns a set of agents and a set of tasks, plans the tasks into
//! dependency waves, and runs one wave at a time against a reasoning engine.
//! The execution context is read by a whole wave and written only after the
//! wave's tasks finish.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use md5::{Digest, Md5};
use uuid::Uuid;

use crate::agent::Agent;
use crate::agents::crew_agent_executor::CrewAgentExecutor;
use crate::context::{ExecutionContext, RunInputs};
use crate::crews::crew_output::CrewOutput;
use crate::crews::execution_plan::ExecutionPlan;
use crate::llms::base_llm::ReasoningEngine;
use crate::process::{FailurePolicy, Process};
use crate::task::{Task, TaskId};
use crate::tasks::task_result::{TaskResult, TaskStatus};
use crate::utilities::errors::{CrewError, InvalidPipelineError, UnresolvedPlaceholderError};
use crate::utilities::file_handler::FileHandler;

/// Callback invoked with every task result as soon as it is final.
pub type TaskCallback = Box<dyn Fn(&TaskResult) + Send + Sync>;

/// Represents a group of agents, defining how they should collaborate and the
/// tasks they should perform.
pub struct Crew {
    /// Unique identifier for the crew instance.
    pub id: Uuid,
    /// Optional name for the crew.
    pub name: Option<String>,
    /// Agents part of this crew, unique by role.
    pub agents: Vec<Agent>,
    /// Tasks assigned to the crew, in declaration order.
    pub tasks: Vec<Task>,
    /// How tasks within a wave are scheduled.
    pub process: Process,
    /// What happens to the rest of the run after a task fails.
    pub failure_policy: FailurePolicy,
    /// Deadline applied to every task.
    pub task_timeout: Option<Duration>,
    /// Directory relative output files are resolved against.
    pub output_dir: Option<PathBuf>,
    engine: Arc<dyn ReasoningEngine>,
    task_callback: Option<TaskCallback>,
}

impl fmt::Debug for Crew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crew")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("agents", &self.agents)
            .field("tasks", &self.tasks)
            .field("process", &self.process)
            .field("failure_policy", &self.failure_policy)
            .field("task_timeout", &self.task_timeout)
            .field("output_dir", &self.output_dir)
            .field("engine", &self.engine)
            .field("task_callback", &self.task_callback.is_some())
            .finish()
    }
}

impl Crew {
    /// Create a new Crew. Validation is deferred to `plan` and `kickoff`.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, engine: Arc<dyn ReasoningEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            agents,
            tasks,
            process: Process::default(),
            failure_policy: FailurePolicy::default(),
            task_timeout: None,
            output_dir: None,
            engine,
            task_callback: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Option<Duration>) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_task_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TaskResult) + Send + Sync + 'static,
    {
        self.task_callback = Some(Box::new(callback));
        self
    }

    /// MD5 over agent keys and task keys, in declaration order.
    pub fn key(&self) -> String {
        let mut source: Vec<String> = self.agents.iter().map(Agent::key).collect();
        for task in &self.tasks {
            source.push(task.key());
        }
        let combined = source.join("|");
        let mut hasher = Md5::new();
        hasher.update(combined.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn agent_registry(&self) -> Result<HashMap<&str, &Agent>, InvalidPipelineError> {
        let mut registry = HashMap::with_capacity(self.agents.len());
        for agent in &self.agents {
            if registry.insert(agent.role.as_str(), agent).is_some() {
                return Err(InvalidPipelineError::DuplicateAgent(agent.role.clone()));
            }
        }
        Ok(registry)
    }

    /// Validate agents and the task graph and resolve the execution waves.
    pub fn plan(&self) -> Result<ExecutionPlan, InvalidPipelineError> {
        self.assignments()?;
        ExecutionPlan::build(&self.tasks)
    }

    /// Owning agent of every task, in declaration order.
    fn assignments(&self) -> Result<Vec<&Agent>, InvalidPipelineError> {
        let registry = self.agent_registry()?;
        self.tasks
            .iter()
            .map(|task| {
                registry.get(task.agent.as_str()).copied().ok_or_else(|| {
                    InvalidPipelineError::UnknownAgent {
                        task: task.id.clone(),
                        agent: task.agent.clone(),
                    }
                })
            })
            .collect()
    }

    /// Check that every task template renders with `inputs`.
    pub fn validate_inputs(&self, inputs: &RunInputs) -> Result<(), UnresolvedPlaceholderError> {
        for task in &self.tasks {
            task.render(inputs)?;
        }
        Ok(())
    }

    /// Execute the crew's workflow.
    ///
    /// Fails before any task runs if the pipeline is invalid or an input is
    /// missing. Otherwise returns one `TaskResult` per task, whatever their
    /// individual outcome.
    pub async fn kickoff(&self, inputs: &RunInputs) -> Result<CrewOutput, CrewError> {
        let plan = self.plan()?;
        let assignments = self.assignments()?;
        self.validate_inputs(inputs)?;

        log::info!(
            "Crew '{}' (key {}) kickoff: {} tasks in {} waves {} [process={}, failure_policy={}]",
            self.name.as_deref().unwrap_or("crew"),
            self.key(),
            self.tasks.len(),
            plan.len(),
            plan,
            self.process,
            self.failure_policy
        );
        for task in &self.tasks {
            log::debug!("Task '{}' key {}", task.id, task.key());
        }

        let executor = CrewAgentExecutor::new(self.engine.clone())
            .with_timeout(self.task_timeout)
            .with_file_handler(FileHandler::new(self.output_dir.clone()));

        let index: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();
        let mut results: Vec<Option<TaskResult>> = vec![None; self.tasks.len()];
        let mut context = ExecutionContext::new();
        let mut aborted_by: Option<TaskId> = None;

        for (n, wave) in plan.waves().iter().enumerate() {
            let mut runnable = Vec::with_capacity(wave.len());
            for id in wave {
                let i = index[id.as_str()];
                let task = &self.tasks[i];
                match self.blocker(task, aborted_by.as_ref(), &results, &index) {
                    Some(blocker) => {
                        log::info!("Skipping task '{}': blocked by '{}'", task.id, blocker);
                        let skipped = TaskResult::pending(task.id.clone(), task.agent.clone())
                            .skip(blocker);
                        self.record(skipped, i, &mut results, &mut context, &mut aborted_by);
                    }
                    None => runnable.push((task, assignments[i])),
                }
            }

            log::debug!("Running wave {} ({} tasks)", n, runnable.len());
            for result in self.run_wave(&executor, &runnable, &context, inputs).await {
                let i = index[result.task_id.as_str()];
                self.record(result, i, &mut results, &mut context, &mut aborted_by);
            }
        }

        let output = CrewOutput::new(self.id, plan, results.into_iter().flatten().collect());
        log::info!(
            "Crew run finished: {} succeeded, {} failed, {} skipped",
            output.succeeded().count(),
            output.failed().count(),
            output.skipped().count()
        );
        Ok(output)
    }

    /// Task that prevents `task` from running, if any.
    fn blocker(
        &self,
        task: &Task,
        aborted_by: Option<&TaskId>,
        results: &[Option<TaskResult>],
        index: &HashMap<&str, usize>,
    ) -> Option<TaskId> {
        if let Some(failed) = aborted_by {
            return Some(failed.clone());
        }
        task.context
            .iter()
            .find(|dep| {
                !results[index[dep.as_str()]]
                    .as_ref()
                    .map_or(false, TaskResult::is_succeeded)
            })
            .cloned()
    }

    fn record(
        &self,
        result: TaskResult,
        i: usize,
        results: &mut [Option<TaskResult>],
        context: &mut ExecutionContext,
        aborted_by: &mut Option<TaskId>,
    ) {
        match result.status {
            TaskStatus::Succeeded => {
                if let Some(raw) = result.raw() {
                    context.insert(result.task_id.clone(), raw);
                }
            }
            TaskStatus::Failed => {
                if self.failure_policy == FailurePolicy::AbortRun && aborted_by.is_none() {
                    log::warn!("Aborting run after failure of task '{}'", result.task_id);
                    *aborted_by = Some(result.task_id.clone());
                }
            }
            _ => {}
        }
        if let Some(ref callback) = self.task_callback {
            callback(&result);
        }
        results[i] = Some(result);
    }

    /// Run the runnable tasks of one wave against a read-only context.
    async fn run_wave(
        &self,
        executor: &CrewAgentExecutor,
        wave: &[(&Task, &Agent)],
        context: &ExecutionContext,
        inputs: &RunInputs,
    ) -> Vec<TaskResult> {
        match self.process {
            Process::Parallel => {
                join_all(
                    wave.iter()
                        .map(|&(task, agent)| executor.execute(task, agent, context, inputs)),
                )
                .await
            }
            Process::Sequential => {
                let mut results = Vec::with_capacity(wave.len());
                let mut start = 0;
                while start < wave.len() {
                    if self.failure_policy == FailurePolicy::AbortRun {
                        let failed = results
                            .iter()
                            .find(|r: &&TaskResult| r.status == TaskStatus::Failed);
                        if let Some(failed) = failed {
                            let blocker = failed.task_id.clone();
                            for (task, _) in &wave[start..] {
                                log::info!("Skipping task '{}': blocked by '{}'", task.id, blocker);
                                results.push(
                                    TaskResult::pending(task.id.clone(), task.agent.clone())
                                        .skip(blocker.clone()),
                                );
                            }
                            break;
                        }
                    }

                    // Contiguous async tasks run as one batch.
                    let end = if wave[start].0.async_execution {
                        start
                            + wave[start..]
                                .iter()
                                .take_while(|(task, _)| task.async_execution)
                                .count()
                    } else {
                        start + 1
                    };
                    let batch = wave[start..end]
                        .iter()
                        .map(|&(task, agent)| executor.execute(task, agent, context, inputs));
                    results.extend(join_all(batch).await);
                    start = end;
                }
                results
            }
        }
    }
}
