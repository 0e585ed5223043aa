//! Core data model: build configuration, lifecycle stages and the persisted
//! configuration record.

pub mod configuration;
pub mod record;
pub mod stage;

pub use configuration::{
    BuildConfiguration, BuildType, Component, ConfigError, OutputKind, Platform, RawConfiguration,
};
pub use record::write_record;
pub use stage::ActionStage;
