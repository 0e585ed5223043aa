//! Stage components: cache invalidation, command generation and launching.
//!
//! Nothing here compiles anything. Every stage either touches the
//! filesystem directly or describes the native tool commands to run.

pub mod clear;
pub mod command;
pub mod generator;
pub mod launcher;

pub use clear::{CacheInvalidator, ClearError, ClearReport};
pub use command::{CommandRunner, ExternalCommand, SystemRunner};
pub use generator::{CommandGenerator, GenerateError};
pub use launcher::LaunchStatus;
