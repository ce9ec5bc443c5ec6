//! Tool registry for resolving tool ids named in pipeline definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::base_tool::BaseTool;

/// Tools indexed by the id a pipeline definition refers to them by.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn BaseTool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ToolRegistry").field("tools", &ids).finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under `id`, replacing any previous registration.
    pub fn register(&mut self, id: impl Into<String>, tool: Arc<dyn BaseTool>) {
        let id = id.into();
        if self.tools.insert(id.clone(), tool).is_some() {
            log::warn!("Tool '{}' registered twice; keeping the latest", id);
        }
    }

    /// Resolve a tool id.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn BaseTool>> {
        self.tools.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
