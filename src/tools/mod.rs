//! Tools available to agents.
//!
//! This module provides the tool contract (`BaseTool`), a function-backed
//! `Tool`, the built-in `FileReadTool` and the `ToolRegistry` used to resolve
//! tool ids from pipeline definitions.

pub mod base_tool;
pub mod file_read_tool;
pub mod registry;
pub mod tool_types;

// Re-exports for convenience
pub use base_tool::{BaseTool, Tool, ToolError, ToolFn};
pub use file_read_tool::FileReadTool;
pub use registry::ToolRegistry;
pub use tool_types::ToolCategory;
