//! Reasoning engine contract.
//!
//! The reasoning engine is the opaque decision process that turns a rendered
//! task, its owning agent, the agent's tools and the task's upstream context
//! into output text. The orchestrator only depends on this trait, so any
//! engine (a hosted LLM, a local model, a deterministic stub) can be plugged
//! in.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::agent::Agent;
use crate::context::UpstreamContext;
use crate::task::TaskId;
use crate::tools::base_tool::{BaseTool, ToolError};

/// Error returned by a reasoning engine.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// A tool call failed and the engine gave up on the task.
    #[error("tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    /// The engine could not be configured.
    #[error("reasoning engine misconfigured: {0}")]
    Configuration(String),

    /// Transport failure talking to a remote engine.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine answered with something it could not turn into output.
    #[error("{0}")]
    Engine(String),
}

/// Everything an engine sees for one task.
#[derive(Debug, Clone, Copy)]
pub struct ReasoningRequest<'a> {
    pub task_id: &'a TaskId,
    /// Rendered task description.
    pub description: &'a str,
    /// Rendered expected-output description.
    pub expected_output: &'a str,
    pub agent: &'a Agent,
    /// The owning agent's tool set.
    pub tools: &'a [Arc<dyn BaseTool>],
    /// Outputs of exactly the task's declared dependencies.
    pub upstream_context: &'a UpstreamContext,
}

impl<'a> ReasoningRequest<'a> {
    /// Task prompt: description followed by the expected output.
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nExpected Output: {}",
            self.description, self.expected_output
        )
    }

    pub fn find_tool(&self, name: &str) -> Option<&'a Arc<dyn BaseTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Invoke one of the agent's tools by name.
    ///
    /// Fails with `ReasoningError::Tool` if the agent has no such tool or the
    /// tool itself fails.
    pub fn call_tool(&self, name: &str, request: Value) -> Result<Value, ReasoningError> {
        let tool = self.find_tool(name).ok_or_else(|| ReasoningError::Tool {
            tool: name.to_string(),
            source: ToolError::InvalidRequest(format!(
                "tool is not available to agent '{}'",
                self.agent.role
            )),
        })?;
        log::debug!(
            "Task '{}': agent '{}' calling tool '{}'",
            self.task_id,
            self.agent.role,
            name
        );
        tool.invoke(request).map_err(|source| ReasoningError::Tool {
            tool: name.to_string(),
            source,
        })
    }
}

/// A pluggable reasoning engine.
///
/// Implementations must be stateless per call: the orchestrator may invoke
/// the same engine concurrently for independent tasks.
#[async_trait]
pub trait ReasoningEngine: Send + Sync + fmt::Debug {
    /// Produce the output text for one task.
    async fn invoke(&self, request: &ReasoningRequest<'_>) -> Result<String, ReasoningError>;
}
