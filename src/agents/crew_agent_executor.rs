//! Single-task executor.
//!
//! `CrewAgentExecutor` runs exactly one task: it renders the task templates,
//! scopes the execution context to the task's declared dependencies, invokes
//! the reasoning engine under an optional deadline, and persists the output
//! artifact. Every failure is captured in the returned `TaskResult`.

use std::sync::Arc;
use std::time::Duration;

use crate::agent::Agent;
use crate::context::{ExecutionContext, RunInputs};
use crate::llms::base_llm::{ReasoningEngine, ReasoningRequest};
use crate::task::Task;
use crate::tasks::task_output::TaskOutput;
use crate::tasks::task_result::TaskResult;
use crate::utilities::errors::TaskExecutionError;
use crate::utilities::file_handler::FileHandler;

/// Runs one task against a reasoning engine.
#[derive(Debug, Clone)]
pub struct CrewAgentExecutor {
    engine: Arc<dyn ReasoningEngine>,
    /// Deadline for a single engine call.
    pub timeout: Option<Duration>,
    pub file_handler: FileHandler,
}

impl CrewAgentExecutor {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self {
            engine,
            timeout: None,
            file_handler: FileHandler::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_file_handler(mut self, file_handler: FileHandler) -> Self {
        self.file_handler = file_handler;
        self
    }

    /// Execute `task` as `agent`, seeing only the outputs of its declared
    /// dependencies in `context`.
    pub async fn execute(
        &self,
        task: &Task,
        agent: &Agent,
        context: &ExecutionContext,
        inputs: &RunInputs,
    ) -> TaskResult {
        let result = TaskResult::pending(task.id.clone(), agent.role.clone()).start();
        if agent.verbose {
            log::info!("Agent '{}' starting task '{}'", agent.role, task.id);
        } else {
            log::debug!("Agent '{}' starting task '{}'", agent.role, task.id);
        }

        let result = match self.run(task, agent, context, inputs).await {
            Ok(output) => result.succeed(output),
            Err(e) => {
                log::warn!("Task '{}' failed: {}", task.id, e);
                return result.fail(e);
            }
        };

        if agent.verbose {
            log::info!(
                "Task '{}' finished in {:.3}s",
                task.id,
                result.execution_duration().unwrap_or_default()
            );
        } else {
            log::debug!("Task '{}' finished", task.id);
        }
        result
    }

    async fn run(
        &self,
        task: &Task,
        agent: &Agent,
        context: &ExecutionContext,
        inputs: &RunInputs,
    ) -> Result<TaskOutput, TaskExecutionError> {
        let rendered = task.render(inputs)?;
        let upstream = context.scoped(&task.context);
        let request = ReasoningRequest {
            task_id: &task.id,
            description: &rendered.description,
            expected_output: &rendered.expected_output,
            agent,
            tools: agent.tools(),
            upstream_context: &upstream,
        };

        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.engine.invoke(&request))
                .await
                .map_err(|_| TaskExecutionError::Timeout { limit })??,
            None => self.engine.invoke(&request).await?,
        };

        let output_file = match rendered.output_file {
            Some(ref path) => Some(
                self.file_handler
                    .save(path, &raw, task.create_directory)
                    .map_err(|e| TaskExecutionError::Persistence {
                        path: self.file_handler.resolve(path),
                        message: e.to_string(),
                    })?,
            ),
            None => None,
        };

        Ok(TaskOutput::new(
            rendered.description,
            rendered.expected_output,
            agent.role.clone(),
            raw,
        )
        .with_output_file(output_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UpstreamContext;
    use crate::llms::base_llm::ReasoningError;
    use crate::llms::echo::EchoEngine;
    use crate::task::TaskId;
    use crate::tasks::task_result::TaskStatus;
    use crate::tools::base_tool::{Tool, ToolError};
    use crate::tools::tool_types::ToolCategory;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records the upstream context it was given and echoes the description.
    #[derive(Debug, Default)]
    struct RecordingEngine {
        seen: Mutex<Vec<UpstreamContext>>,
    }

    #[async_trait]
    impl ReasoningEngine for RecordingEngine {
        async fn invoke(&self, request: &ReasoningRequest<'_>) -> Result<String, ReasoningError> {
            self.seen.lock().unwrap().push(request.upstream_context.clone());
            Ok(request.description.to_string())
        }
    }

    #[derive(Debug)]
    struct SlowEngine;

    #[async_trait]
    impl ReasoningEngine for SlowEngine {
        async fn invoke(&self, _request: &ReasoningRequest<'_>) -> Result<String, ReasoningError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        }
    }

    /// Calls the agent's `read_resume` tool.
    #[derive(Debug)]
    struct ToolCallingEngine;

    #[async_trait]
    impl ReasoningEngine for ToolCallingEngine {
        async fn invoke(&self, request: &ReasoningRequest<'_>) -> Result<String, ReasoningError> {
            let value = request.call_tool("read_resume", Value::Null)?;
            Ok(value.to_string())
        }
    }

    fn inputs() -> RunInputs {
        RunInputs::from([("github_url".to_string(), "https://github.com/ada".to_string())])
    }

    #[tokio::test]
    async fn test_engine_sees_only_declared_dependencies() {
        let engine = Arc::new(RecordingEngine::default());
        let executor = CrewAgentExecutor::new(engine.clone());
        let mut context = ExecutionContext::new();
        context.insert(TaskId::from("research"), "requirements");
        context.insert(TaskId::from("unrelated"), "noise");

        let task = Task::new("strategy", "Tailor for {github_url}", "Resume", "Strategist")
            .with_context(["research"]);
        let agent = Agent::new("Strategist", "g", "b");

        let result = executor.execute(&task, &agent, &context, &inputs()).await;
        assert_eq!(result.status, TaskStatus::Succeeded);
        assert_eq!(result.raw(), Some("Tailor for https://github.com/ada"));

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[0].get("research"), Some("requirements"));
        assert!(seen[0].get("unrelated").is_none());
    }

    #[tokio::test]
    async fn test_timeout_fails_task() {
        let executor = CrewAgentExecutor::new(Arc::new(SlowEngine))
            .with_timeout(Some(Duration::from_millis(20)));
        let task = Task::new("research", "d", "e", "A");
        let agent = Agent::new("A", "g", "b");

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        assert_eq!(result.status, TaskStatus::Failed);
        assert_eq!(
            result.error,
            Some(TaskExecutionError::Timeout {
                limit: Duration::from_millis(20)
            })
        );
    }

    #[tokio::test]
    async fn test_tool_failure_is_tool_error() {
        let agent = Agent::new("Profiler", "g", "b").with_tool(Arc::new(Tool::new(
            "read_resume",
            ToolCategory::FileRead,
            |_| Err(ToolError::Failed("resume.md not found".to_string())),
        )));
        let task = Task::new("profile", "d", "e", "Profiler");
        let executor = CrewAgentExecutor::new(Arc::new(ToolCallingEngine));

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        assert_eq!(
            result.error,
            Some(TaskExecutionError::Tool {
                tool: "read_resume".to_string(),
                message: "resume.md not found".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_output_file_written_with_raw_output() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CrewAgentExecutor::new(Arc::new(EchoEngine::default()))
            .with_file_handler(FileHandler::new(Some(dir.path().to_path_buf())));
        let task = Task::new("strategy", "Tailor", "Resume", "A").with_output_file("out/resume.md");
        let agent = Agent::new("A", "g", "b");

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        let path = dir.path().join("out/resume.md");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "OK:Tailor");
        assert_eq!(result.output.unwrap().output_file, Some(path));
    }

    #[tokio::test]
    async fn test_persistence_failure_fails_task() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CrewAgentExecutor::new(Arc::new(EchoEngine::default()))
            .with_file_handler(FileHandler::new(Some(dir.path().to_path_buf())));
        let task = Task::new("strategy", "Tailor", "Resume", "A")
            .with_output_file("missing/resume.md")
            .with_create_directory(false);
        let agent = Agent::new("A", "g", "b");

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        match result.error {
            Some(TaskExecutionError::Persistence { path, .. }) => {
                assert_eq!(path, dir.path().join("missing/resume.md"));
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
        assert!(result.output.is_none());
    }

    #[tokio::test]
    async fn test_failed_task_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CrewAgentExecutor::new(Arc::new(SlowEngine))
            .with_timeout(Some(Duration::from_millis(10)))
            .with_file_handler(FileHandler::new(Some(dir.path().to_path_buf())));
        let task = Task::new("strategy", "Tailor", "Resume", "A").with_output_file("resume.md");
        let agent = Agent::new("A", "g", "b");

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        assert_eq!(result.status, TaskStatus::Failed);
        assert!(!dir.path().join("resume.md").exists());
    }

    #[tokio::test]
    async fn test_unresolved_placeholder_is_template_error() {
        let executor = CrewAgentExecutor::new(Arc::new(EchoEngine::default()));
        let task = Task::new("profile", "Use {personal_writeup}", "e", "A");
        let agent = Agent::new("A", "g", "b");

        let result = executor
            .execute(&task, &agent, &ExecutionContext::new(), &RunInputs::new())
            .await;
        assert!(matches!(result.error, Some(TaskExecutionError::Template(_))));
    }
}
