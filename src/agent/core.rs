//! Core Agent struct.
//!
//! An agent is a named role with a goal, a backstory that is fed to the
//! reasoning engine, and a bounded, ordered set of tools fixed at
//! construction time.

use std::fmt;
use std::sync::Arc;

use md5::{Digest, Md5};

use crate::tools::base_tool::BaseTool;

/// Represents an agent in a crew.
///
/// Agents are immutable once handed to a `Crew`; they are shared by
/// reference with every task they own.
#[derive(Clone)]
pub struct Agent {
    /// Role of the agent. Unique within a crew.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Backstory of the agent.
    pub backstory: String,
    /// Tools at the agent's disposal, in declaration order.
    tools: Vec<Arc<dyn BaseTool>>,
    /// Log task progress at `info` instead of `debug`.
    pub verbose: bool,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("tools", &self.tool_names())
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a new Agent without tools.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            verbose: false,
        }
    }

    /// Give the agent its tool set. Tools sharing a name with an earlier
    /// tool are dropped.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn BaseTool>>) -> Self {
        self.tools.clear();
        for tool in tools {
            self.push_tool(tool);
        }
        self
    }

    /// Add one tool to the agent's tool set.
    pub fn with_tool(mut self, tool: Arc<dyn BaseTool>) -> Self {
        self.push_tool(tool);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn push_tool(&mut self, tool: Arc<dyn BaseTool>) {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            log::warn!(
                "Agent '{}' already has a tool named '{}'; ignoring duplicate",
                self.role,
                tool.name()
            );
            return;
        }
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Arc<dyn BaseTool>] {
        &self.tools
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// MD5 of `role|goal|backstory`.
    pub fn key(&self) -> String {
        let source = format!("{}|{}|{}", self.role, self.goal, self.backstory);
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent(role={}, goal={})", self.role, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::base_tool::Tool;
    use crate::tools::tool_types::ToolCategory;

    fn tool(name: &str) -> Arc<dyn BaseTool> {
        Arc::new(Tool::new(name, ToolCategory::Other, Ok))
    }

    #[test]
    fn test_tools_keep_order_and_drop_duplicates() {
        let agent = Agent::new("Researcher", "Analyze postings", "Seasoned analyst")
            .with_tools(vec![tool("scrape"), tool("search"), tool("scrape")]);
        assert_eq!(agent.tool_names(), vec!["scrape", "search"]);
    }

    #[test]
    fn test_shared_tool_instance() {
        let shared = tool("read_resume");
        let a = Agent::new("Profiler", "g", "b").with_tool(Arc::clone(&shared));
        let b = Agent::new("Strategist", "g", "b").with_tool(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&a.tools()[0], &b.tools()[0]));
    }

    #[test]
    fn test_key_depends_on_identity_fields() {
        let a = Agent::new("Researcher", "g", "b");
        let b = Agent::new("Researcher", "g", "b").with_verbose(true);
        let c = Agent::new("Profiler", "g", "b");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
