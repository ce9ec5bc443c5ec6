//! Crew sub-modules: dependency planning and run output.

pub mod crew_output;
pub mod execution_plan;

pub use crew_output::CrewOutput;
pub use execution_plan::ExecutionPlan;
