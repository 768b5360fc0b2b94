//! Release pipeline state machine and orchestration.

mod orchestrator;
mod state;

pub use orchestrator::{PipelineOptions, ReleasePipeline};
pub use state::{PipelineRun, PipelineState};
