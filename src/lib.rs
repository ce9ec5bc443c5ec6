//! # crewai-pipeline
//!
//! Dependency-aware orchestration of role-based agent crews.
//!
//! A crew is a set of agents (a role, a goal, a backstory and a tool set)
//! and a set of tasks. Each task names its owning agent and the upstream
//! tasks whose outputs it consumes. Running a crew:
//!
//! 1. validates the task graph and plans it into dependency waves,
//! 2. renders every task template against the run inputs,
//! 3. executes wave by wave against a pluggable `ReasoningEngine`, giving
//!    each task the outputs of exactly its declared dependencies,
//! 4. persists task outputs to their output files and returns one
//!    `TaskResult` per task.

pub mod agent;
pub mod agents;
pub mod cli;
pub mod context;
pub mod crew;
pub mod crews;
pub mod llms;
pub mod process;
pub mod task;
pub mod tasks;
pub mod tools;
pub mod utilities;

pub use agent::Agent;
pub use context::{ExecutionContext, RunInputs, UpstreamContext};
pub use crew::Crew;
pub use crews::{CrewOutput, ExecutionPlan};
pub use llms::{EchoEngine, OpenAIEngine, ReasoningEngine, ReasoningError, ReasoningRequest};
pub use process::{FailurePolicy, Process};
pub use task::{Task, TaskId};
pub use tasks::{TaskOutput, TaskResult, TaskStatus};
pub use tools::{BaseTool, FileReadTool, Tool, ToolCategory, ToolRegistry};
pub use utilities::errors::{
    CrewError, InvalidPipelineError, TaskExecutionError, UnresolvedPlaceholderError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
