//! External commands and how they are run.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::process::{find_executable, ProcessBuilder};

/// A native tool invocation: program, argument list and working directory.
///
/// Arguments are kept as a list and handed to the OS as-is. Nothing is ever
/// passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ExternalCommand {
    pub fn new(program: impl AsRef<Path>, cwd: impl AsRef<Path>) -> Self {
        ExternalCommand {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Add a `-DKEY=VALUE` cache definition.
    pub fn define(self, key: &str, value: impl fmt::Display) -> Self {
        self.arg(format!("-D{}={}", key, value))
    }

    pub fn to_process(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.args)
            .cwd(&self.cwd)
    }

    /// Shell-pasteable rendering, for display only.
    pub fn display_command(&self) -> String {
        self.to_process().display_command()
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

/// Runs external commands and reports their exit code.
pub trait CommandRunner {
    /// Run `cmd` to completion. `Err` means the command could not be
    /// started at all.
    fn run(&mut self, cmd: &ExternalCommand) -> Result<i32>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ExternalCommand) -> Result<i32> {
        // Bare names are looked up up-front for a clearer error
        if cmd.program.components().count() == 1 && find_executable(&cmd.program).is_none() {
            bail!(
                "`{}` not found in PATH\n\
                 install it or set its location in .slark/config.toml",
                cmd.program.display()
            );
        }

        let status = cmd.to_process().status()?;
        // No code means the child was killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}
