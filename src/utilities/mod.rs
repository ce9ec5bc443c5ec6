//! Utility modules: configuration loading, error types, output persistence
//! and template interpolation.

pub mod config;
pub mod errors;
pub mod file_handler;
pub mod string_utils;

pub use config::{ConfigError, Pipeline, PipelineConfig};
pub use errors::{CrewError, InvalidPipelineError, TaskExecutionError, UnresolvedPlaceholderError};
pub use file_handler::FileHandler;
