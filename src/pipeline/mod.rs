//! Staged pipeline execution.

pub mod driver;

pub use driver::{PipelineDriver, assign_speakers};
