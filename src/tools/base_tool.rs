//! Base tool definitions.
//!
//! Provides the `BaseTool` trait every capability provider implements and
//! the concrete `Tool` struct that wraps a callable function.
//!
//! Tools are stateless from the orchestrator's point of view: `invoke` takes
//! `&self`, so one instance can be shared by several agents behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::tool_types::ToolCategory;

/// Error returned by a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The request did not match the tool's expected shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The tool ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Contract for every tool an agent may be given.
pub trait BaseTool: Send + Sync + fmt::Debug {
    /// The unique name of the tool.
    fn name(&self) -> &str;

    fn category(&self) -> ToolCategory;

    /// Description used to tell the reasoning engine how/when/why to use the tool.
    fn description(&self) -> &str {
        ""
    }

    /// Synchronous execution of the tool.
    fn invoke(&self, request: Value) -> Result<Value, ToolError>;
}

/// Type alias for a shared synchronous tool function.
pub type ToolFn = Arc<dyn Fn(Value) -> Result<Value, ToolError> + Send + Sync>;

/// Concrete tool that wraps a callable function.
#[derive(Clone)]
pub struct Tool {
    tool_name: String,
    tool_category: ToolCategory,
    tool_description: String,
    func: ToolFn,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.tool_name)
            .field("category", &self.tool_category)
            .field("description", &self.tool_description)
            .finish()
    }
}

impl Tool {
    /// Create a new Tool wrapping the given function.
    pub fn new<F>(name: impl Into<String>, category: ToolCategory, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            tool_name: name.into(),
            tool_category: category,
            tool_description: String::new(),
            func: Arc::new(func),
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.tool_description = description.into();
        self
    }
}

impl BaseTool for Tool {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn category(&self) -> ToolCategory {
        self.tool_category
    }

    fn description(&self) -> &str {
        &self.tool_description
    }

    fn invoke(&self, request: Value) -> Result<Value, ToolError> {
        (self.func)(request)
    }
}
