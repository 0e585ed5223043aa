//! slark-build - build orchestrator for the slark native project
//!
//! This crate selects, sequences and runs the build lifecycle stages
//! (clear, generate, build, run) for desktop, iOS and Android, driving
//! CMake, Xcode and Ninja as external tools.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for slark-build unit tests.
///
/// Only compiled for tests. Provides a mock command executor and project
/// tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ActionStage, BuildConfiguration, ConfigError, RawConfiguration};
pub use ops::{rebuild, ActionPipeline, PipelineResult, RebuildOptions};
pub use util::context::ProjectContext;
