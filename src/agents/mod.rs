//! Task execution on behalf of agents.

pub mod crew_agent_executor;

pub use crew_agent_executor::CrewAgentExecutor;
