//! Reasoning engines.
//!
//! - [`base_llm`] - The `ReasoningEngine` trait and the per-task request
//! - [`echo`] - A deterministic engine for dry runs and tests
//! - [`providers`] - Engines backed by hosted model APIs

pub mod base_llm;
pub mod echo;
pub mod providers;

// Re-exports for convenience
pub use base_llm::{ReasoningEngine, ReasoningError, ReasoningRequest};
pub use echo::EchoEngine;
pub use providers::OpenAIEngine;
