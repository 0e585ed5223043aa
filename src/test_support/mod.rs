//! Test utilities and mocks for slark-build unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use slark_build::test_support::{MockExecutor, quiet_shell};
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::succeeding();
//!     exec.fail_when_contains("--build", 2);
//!
//!     // Hand `&mut exec` to an ActionPipeline...
//! }
//! ```

pub mod fixtures;

use anyhow::{bail, Result};

use crate::builder::command::{CommandRunner, ExternalCommand};

pub use fixtures::*;

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// What a matched command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// Exit with this code.
    Exit(i32),
    /// Fail to start.
    SpawnError,
}

/// Mock process executor.
///
/// Records every command line it is asked to run and answers from the first
/// matching expectation, falling back to a default outcome.
#[derive(Debug)]
pub struct MockExecutor {
    expectations: Vec<(CommandPattern, MockOutcome)>,
    calls: Vec<String>,
    default_outcome: Option<MockOutcome>,
}

impl MockExecutor {
    /// An executor that rejects every command it was not told about.
    pub fn new() -> Self {
        MockExecutor {
            expectations: Vec::new(),
            calls: Vec::new(),
            default_outcome: None,
        }
    }

    /// An executor where every command exits 0 unless told otherwise.
    pub fn succeeding() -> Self {
        let mut exec = Self::new();
        exec.default_outcome = Some(MockOutcome::Exit(0));
        exec
    }

    /// Add an expectation.
    pub fn expect(&mut self, pattern: CommandPattern, outcome: MockOutcome) -> &mut Self {
        self.expectations.push((pattern, outcome));
        self
    }

    /// Commands containing `substring` exit with `code`.
    pub fn fail_when_contains(&mut self, substring: &str, code: i32) -> &mut Self {
        self.expect(
            CommandPattern::Contains(substring.to_string()),
            MockOutcome::Exit(code),
        )
    }

    /// Commands starting with `program` cannot be started.
    pub fn unavailable(&mut self, program: &str) -> &mut Self {
        self.expect(
            CommandPattern::StartsWith(program.to_string()),
            MockOutcome::SpawnError,
        )
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockExecutor {
    fn run(&mut self, cmd: &ExternalCommand) -> Result<i32> {
        let full_cmd = cmd.display_command();
        self.calls.push(full_cmd.clone());

        let outcome = self
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&full_cmd))
            .map(|(_, outcome)| *outcome)
            .or(self.default_outcome);

        match outcome {
            Some(MockOutcome::Exit(code)) => Ok(code),
            Some(MockOutcome::SpawnError) => bail!("`{}` not found in PATH", cmd.program.display()),
            None => bail!("unexpected command: {}", full_cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_records_and_matches() {
        let mut exec = MockExecutor::new();
        exec.expect(
            CommandPattern::Exact("cmake --build /p/build".to_string()),
            MockOutcome::Exit(3),
        );

        let cmd = ExternalCommand::new("cmake", "/p").args(["--build", "/p/build"]);
        assert_eq!(exec.run(&cmd).unwrap(), 3);

        let other = ExternalCommand::new("xcodebuild", "/p");
        assert!(exec.run(&other).is_err());

        assert_eq!(exec.calls().len(), 2);
    }

    #[test]
    fn test_command_pattern() {
        assert!(CommandPattern::Any.matches("anything"));
        assert!(CommandPattern::StartsWith("cmake".into()).matches("cmake -S ."));
        assert!(!CommandPattern::Contains("Ninja".into()).matches("cmake -G Xcode"));
    }
}
