//! Task execution records: successful outputs and per-run results.

pub mod task_output;
pub mod task_result;

pub use task_output::TaskOutput;
pub use task_result::{TaskResult, TaskStatus};
