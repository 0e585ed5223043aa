//! High-level operations.
//!
//! This module contains the action pipeline and the end-to-end invocation
//! built on top of it.

pub mod pipeline;
pub mod rebuild;

pub use pipeline::{ActionPipeline, PipelineError, PipelineResult, StageError, StageFailure};
pub use rebuild::{rebuild, RebuildOptions};
