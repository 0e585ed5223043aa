//! Build lifecycle stages.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the build lifecycle.
///
/// Stages are totally ordered. Requesting a stage means running every stage
/// from [`ActionStage::Clear`] up to and including it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStage {
    /// Remove stale CMake artifacts
    Clear,
    /// Generate native project files
    #[serde(rename = "gen")]
    Generate,
    /// Compile the generated project
    Build,
    /// Launch the built executable
    Run,
}

impl ActionStage {
    /// Every stage, in execution order.
    pub const ALL: [ActionStage; 4] = [
        ActionStage::Clear,
        ActionStage::Generate,
        ActionStage::Build,
        ActionStage::Run,
    ];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStage::Clear => "clear",
            ActionStage::Generate => "gen",
            ActionStage::Build => "build",
            ActionStage::Run => "run",
        }
    }

    /// Stages that must run for `self` to be reached, `self` included.
    pub fn prerequisites(self) -> Vec<ActionStage> {
        ActionStage::ALL
            .iter()
            .copied()
            .take_while(|stage| *stage <= self)
            .collect()
    }
}

impl fmt::Display for ActionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid action `{0}`, valid values: clear, gen, build, run")]
pub struct ActionStageParseError(pub String);

impl std::str::FromStr for ActionStage {
    type Err = ActionStageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(ActionStage::Clear),
            "gen" | "generate" => Ok(ActionStage::Generate),
            "build" => Ok(ActionStage::Build),
            "run" => Ok(ActionStage::Run),
            _ => Err(ActionStageParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_fixed() {
        assert!(ActionStage::Clear < ActionStage::Generate);
        assert!(ActionStage::Generate < ActionStage::Build);
        assert!(ActionStage::Build < ActionStage::Run);
    }

    #[test]
    fn test_prerequisites() {
        assert_eq!(ActionStage::Clear.prerequisites(), vec![ActionStage::Clear]);
        assert_eq!(
            ActionStage::Build.prerequisites(),
            vec![ActionStage::Clear, ActionStage::Generate, ActionStage::Build]
        );
        assert_eq!(ActionStage::Run.prerequisites(), ActionStage::ALL.to_vec());
    }

    #[test]
    fn test_parse() {
        assert_eq!("gen".parse::<ActionStage>().unwrap(), ActionStage::Generate);
        assert_eq!("Build".parse::<ActionStage>().unwrap(), ActionStage::Build);
        let err = "install".parse::<ActionStage>().unwrap_err();
        assert!(err.to_string().contains("install"));
    }
}
