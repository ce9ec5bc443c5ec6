//! Agent module.
//!
//! This module contains the `Agent` struct: a role, a goal, a backstory and a
//! fixed tool set.

pub mod core;

// Re-export the main Agent type.
pub use self::core::Agent;
