//! Pipeline configuration loading.
//!
//! A pipeline is declared in YAML: named tools, agents (by role), tasks,
//! default run inputs and crew settings.
//!
//! ```yaml
//! name: job_prep
//! tools:
//!   read_resume: { type: file_read, file_path: ./fake_resume.md }
//! agents:
//!   - role: Resume Strategist for Engineers
//!     goal: Make the resume stand out
//!     backstory: ...
//!     tools: [read_resume]
//! tasks:
//!   - id: strategy
//!     description: Tailor the resume for {job_posting_url}
//!     expected_output: An updated resume
//!     agent: Resume Strategist for Engineers
//!     output_file: tailored_resume.md
//! settings:
//!   process: sequential
//!   failure_policy: abort_run
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::Agent;
use crate::context::RunInputs;
use crate::crew::Crew;
use crate::llms::base_llm::ReasoningEngine;
use crate::process::{FailurePolicy, Process};
use crate::task::{Task, TaskId};
use crate::tools::file_read_tool::FileReadTool;
use crate::tools::registry::ToolRegistry;

/// Error loading a pipeline definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pipeline file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pipeline definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },
}

fn default_true() -> bool {
    true
}

/// A built-in tool declared by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolConfig {
    /// Reads a text file. `file_path` binds a default path.
    FileRead {
        #[serde(default)]
        file_path: Option<PathBuf>,
        #[serde(default)]
        description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Tool ids resolved against the pipeline's `tools` and the registry.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Defaults to `task_<index>`.
    #[serde(default)]
    pub id: Option<TaskId>,
    pub description: String,
    pub expected_output: String,
    pub agent: String,
    #[serde(default)]
    pub context: Vec<TaskId>,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default = "default_true")]
    pub create_directory: bool,
    #[serde(default)]
    pub async_execution: bool,
}

/// Crew-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub process: Process,
    pub failure_policy: FailurePolicy,
    /// Per-task deadline in seconds.
    pub task_timeout_secs: Option<u64>,
    /// Directory relative output files are written under.
    pub output_dir: Option<PathBuf>,
}

/// A pipeline definition as written in YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    /// Default run inputs; overridden per run.
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: Settings,
}

/// A pipeline with tools resolved, ready to become a `Crew`.
#[derive(Debug)]
pub struct Pipeline {
    pub name: Option<String>,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
    pub inputs: RunInputs,
    pub settings: Settings,
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a pipeline file. Relative tool paths are resolved against the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_tool_paths(base);
        }
        log::debug!(
            "Loaded pipeline '{}' from {}: {} agents, {} tasks",
            config.name.as_deref().unwrap_or("unnamed"),
            path.display(),
            config.agents.len(),
            config.tasks.len()
        );
        Ok(config)
    }

    fn resolve_tool_paths(&mut self, base: &Path) {
        for tool in self.tools.values_mut() {
            match tool {
                ToolConfig::FileRead {
                    file_path: Some(path),
                    ..
                } if path.is_relative() => *path = base.join(&*path),
                ToolConfig::FileRead { .. } => {}
            }
        }
    }

    /// Resolve tool ids and build agents and tasks.
    ///
    /// Tools declared in the pipeline are added to `registry`; agents may
    /// reference either those or tools registered beforehand.
    pub fn into_pipeline(self, mut registry: ToolRegistry) -> Result<Pipeline, ConfigError> {
        for (id, tool) in self.tools {
            match tool {
                ToolConfig::FileRead {
                    file_path,
                    description,
                } => {
                    let mut read = FileReadTool::new(id.clone());
                    if let Some(path) = file_path {
                        read = read.with_file_path(path);
                    }
                    if let Some(description) = description {
                        read = read.with_description(description);
                    }
                    registry.register(id, Arc::new(read));
                }
            }
        }

        let agents = self
            .agents
            .into_iter()
            .map(|config| {
                let tools = config
                    .tools
                    .iter()
                    .map(|id| {
                        registry.resolve(id).ok_or_else(|| ConfigError::UnknownTool {
                            agent: config.role.clone(),
                            tool: id.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Agent::new(config.role, config.goal, config.backstory)
                    .with_tools(tools)
                    .with_verbose(config.verbose))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let tasks = self
            .tasks
            .into_iter()
            .enumerate()
            .map(|(i, config)| Task {
                id: config.id.unwrap_or_else(|| TaskId::from_index(i)),
                description: config.description,
                expected_output: config.expected_output,
                agent: config.agent,
                context: config.context,
                output_file: config.output_file,
                create_directory: config.create_directory,
                async_execution: config.async_execution,
            })
            .collect();

        Ok(Pipeline {
            name: self.name,
            agents,
            tasks,
            inputs: self.inputs.into_iter().collect(),
            settings: self.settings,
        })
    }
}

impl Pipeline {
    /// Build a `Crew` running on `engine` with this pipeline's settings.
    pub fn into_crew(self, engine: Arc<dyn ReasoningEngine>) -> Crew {
        let mut crew = Crew::new(self.agents, self.tasks, engine)
            .with_process(self.settings.process)
            .with_failure_policy(self.settings.failure_policy)
            .with_task_timeout(self.settings.task_timeout_secs.map(Duration::from_secs))
            .with_output_dir(self.settings.output_dir);
        if let Some(name) = self.name {
            crew = crew.with_name(name);
        }
        crew
    }
}
