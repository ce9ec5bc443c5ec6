//! Deterministic reasoning engine.
//!
//! `EchoEngine` answers every task with a fixed prefix followed by the
//! rendered description. It never calls tools and never fails, which makes
//! runs reproducible byte-for-byte. Used for dry runs of a pipeline and in
//! tests.

use async_trait::async_trait;

use super::base_llm::{ReasoningEngine, ReasoningError, ReasoningRequest};

/// Default prefix prepended to every answer.
pub const DEFAULT_ECHO_PREFIX: &str = "OK:";

#[derive(Debug, Clone)]
pub struct EchoEngine {
    prefix: String,
}

impl Default for EchoEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ECHO_PREFIX)
    }
}

impl EchoEngine {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl ReasoningEngine for EchoEngine {
    async fn invoke(&self, request: &ReasoningRequest<'_>) -> Result<String, ReasoningError> {
        Ok(format!("{}{}", self.prefix, request.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::context::UpstreamContext;
    use crate::task::TaskId;

    #[tokio::test]
    async fn test_echo_prefixes_description() {
        let agent = Agent::new("Researcher", "g", "b");
        let id = TaskId::from("research");
        let ctx = UpstreamContext::default();
        let request = ReasoningRequest {
            task_id: &id,
            description: "Analyze https://x/1",
            expected_output: "List",
            agent: &agent,
            tools: agent.tools(),
            upstream_context: &ctx,
        };

        let output = EchoEngine::default().invoke(&request).await.unwrap();
        assert_eq!(output, "OK:Analyze https://x/1");
    }
}
