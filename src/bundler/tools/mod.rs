//! External tool invocation.
//!
//! Every tool the pipeline drives goes through [`ToolRunner`], so tests can
//! swap real processes for a recording fake.

mod command;
mod runner;
mod tool_detection;

pub use command::{ToolCommand, ToolOutput, ToolSpec};
pub use runner::{ProcessRunner, ToolRunner};
pub use tool_detection::resolve_program;
