//! OpenAI-compatible chat completions engine.
//!
//! Sends one Chat Completions request per task: a system message built from
//! the agent's role, backstory, goal and tool list, and a user message holding
//! the task prompt plus the upstream context. Works against any endpoint that
//! speaks the OpenAI Chat Completions API.
//!
//! This engine answers in a single turn and does not run a tool-calling loop;
//! tools are described to the model so its answer can reference them.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llms::base_llm::{ReasoningEngine, ReasoningError, ReasoningRequest};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Reasoning engine backed by an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAIEngine {
    /// Model name sent with every request.
    pub model: String,
    api_key: String,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum number of retries on 429 and 5xx responses.
    pub max_retries: u32,
    client: reqwest::Client,
}

impl fmt::Debug for OpenAIEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIEngine")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl OpenAIEngine {
    /// Create a new engine.
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "gpt-4o-mini").
    /// * `api_key` - Bearer token for the API.
    /// * `base_url` - Optional custom base URL.
    /// * `timeout` - Per-request HTTP timeout.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            temperature: None,
            max_retries: 2,
            client,
        })
    }

    /// Build an engine from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and
    /// `OPENAI_MODEL_NAME`.
    pub fn from_env() -> Result<Self, ReasoningError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ReasoningError::Configuration(
                "OpenAI API key not set. Set the OPENAI_API_KEY environment variable.".to_string(),
            )
        })?;
        let model =
            std::env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("OPENAI_BASE_URL").ok();
        Self::new(model, api_key, base_url, Duration::from_secs(120))
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn system_prompt(request: &ReasoningRequest<'_>) -> String {
        let agent = request.agent;
        let tools = if request.tools.is_empty() {
            "none".to_string()
        } else {
            request
                .tools
                .iter()
                .map(|t| format!("- {} ({}): {}", t.name(), t.category(), t.description()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!(
            "You are {}.\n{}\n\nYour goal: {}\n\nAvailable tools:\n{}",
            agent.role, agent.backstory, agent.goal, tools
        )
    }

    fn user_prompt(request: &ReasoningRequest<'_>) -> String {
        let prompt = request.prompt();
        if request.upstream_context.is_empty() {
            return prompt;
        }
        format!("{}\n\nContext:\n{}", prompt, request.upstream_context.flatten())
    }

    /// Request body for one task.
    pub fn build_request_body(&self, request: &ReasoningRequest<'_>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": Self::system_prompt(request) },
                { "role": "user", "content": Self::user_prompt(request) },
            ],
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Extract the answer text from a Chat Completions response.
    pub fn parse_response(response: &Value) -> Result<String, ReasoningError> {
        if let Some(usage) = response.get("usage") {
            log::debug!(
                "OpenAI token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("completion_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("total_tokens").and_then(Value::as_i64).unwrap_or(0),
            );
        }

        response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ReasoningError::Engine("no message content in OpenAI response".to_string())
            })
    }
}

#[async_trait]
impl ReasoningEngine for OpenAIEngine {
    async fn invoke(&self, request: &ReasoningRequest<'_>) -> Result<String, ReasoningError> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(request);

        let mut last_error = ReasoningError::Engine("no request attempted".to_string());
        let mut retry_delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "OpenAI API retry attempt {} for task '{}' after {:?}",
                    attempt,
                    request.task_id,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.into();
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = ReasoningError::Engine(format!("OpenAI API returned {}", status));
                continue;
            }

            let text = response.text().await?;
            if !status.is_success() {
                return Err(ReasoningError::Engine(format!(
                    "OpenAI API error {}: {}",
                    status, text
                )));
            }

            let parsed: Value = serde_json::from_str(&text).map_err(|e| {
                ReasoningError::Engine(format!("invalid JSON from OpenAI API: {}", e))
            })?;
            return Self::parse_response(&parsed);
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::context::ExecutionContext;
    use crate::task::TaskId;
    use crate::tools::{FileReadTool, ToolCategory};
    use std::sync::Arc;

    fn engine() -> OpenAIEngine {
        OpenAIEngine::new(
            "gpt-test",
            "sk-test",
            Some("http://localhost:1/v1/".to_string()),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_includes_agent_and_context() {
        let agent = Agent::new("Resume Strategist", "Make resumes stand out", "Detail oriented")
            .with_tool(Arc::new(FileReadTool::new("read_resume")));
        let mut ctx = ExecutionContext::new();
        ctx.insert(TaskId::from("research"), "Rust, Tokio");
        let upstream = ctx.scoped(&[TaskId::from("research")]);
        let id = TaskId::from("strategy");
        let request = ReasoningRequest {
            task_id: &id,
            description: "Tailor the resume",
            expected_output: "An updated resume",
            agent: &agent,
            tools: agent.tools(),
            upstream_context: &upstream,
        };

        let engine = engine().with_temperature(0.2);
        assert_eq!(engine.base_url, "http://localhost:1/v1");
        assert!(!format!("{:?}", engine).contains("sk-test"));

        let body = engine.build_request_body(&request);
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["temperature"], 0.2);

        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.starts_with("You are Resume Strategist."));
        assert!(system.contains(&format!("read_resume ({})", ToolCategory::FileRead)));

        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.starts_with("Tailor the resume\n\nExpected Output: An updated resume"));
        assert!(user.contains("## research\nRust, Tokio"));
    }

    #[test]
    fn test_parse_response_extracts_content() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Final answer" } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12 }
        });
        assert_eq!(OpenAIEngine::parse_response(&response).unwrap(), "Final answer");
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        assert!(matches!(
            OpenAIEngine::parse_response(&json!({ "choices": [] })),
            Err(ReasoningError::Engine(_))
        ));
    }
}
