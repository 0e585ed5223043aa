//! The action pipeline: Clear -> Generate -> Build -> Run.
//!
//! Requesting a stage runs every stage up to and including it, strictly in
//! order. The first failing stage stops the pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::clear::{CacheInvalidator, ClearReport};
use crate::builder::command::{CommandRunner, ExternalCommand};
use crate::builder::generator::{CommandGenerator, GenerateError};
use crate::builder::launcher::{self, LaunchStatus};
use crate::core::{ActionStage, BuildConfiguration};
use crate::util::context::ProjectContext;
use crate::util::shell::{Shell, Status};

/// Exit code recorded when a command could not be started.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Errors raised before any stage runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("the `{0}` action is not available, the run stage is disabled")]
    StageUnavailable(ActionStage),
}

/// Why a stage failed.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("`{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("failed to launch `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("cannot scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot prepare {}: {message}", path.display())]
    Launch { path: PathBuf, message: String },
}

/// The first stage that failed, and why.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: ActionStage,
    pub error: StageError,
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// Stages that finished successfully, in order
    pub completed: Vec<ActionStage>,

    pub first_failure: Option<StageFailure>,

    /// Report of the Clear stage, if it ran
    pub clear_report: Option<ClearReport>,

    /// Set when Run found no executable
    pub missing_artifact: Option<PathBuf>,

    /// Commands attempted (or, in a dry run, planned), in order
    pub commands: Vec<ExternalCommand>,

    /// Exit code of the last command attempted
    pub last_exit_code: Option<i32>,
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        self.first_failure.is_none()
    }

    /// Process exit code for this run.
    ///
    /// The code of the last external command attempted. When no command ran,
    /// success depends on the Clear walk having no per-path errors.
    pub fn exit_code(&self) -> i32 {
        let code = match self.last_exit_code {
            Some(code) => code,
            None => {
                let clear_failed = self.clear_report.as_ref().is_some_and(|r| r.has_errors());
                i32::from(clear_failed)
            }
        };
        if code == 0 && self.first_failure.is_some() {
            1
        } else {
            code
        }
    }
}

/// Runs build stages in order with fail-fast semantics.
pub struct ActionPipeline<'a> {
    ctx: &'a ProjectContext,
    generator: CommandGenerator<'a>,
    shell: &'a Shell,
    runner: &'a mut dyn CommandRunner,
    run_stage: bool,
    dry_run: bool,
}

impl<'a> ActionPipeline<'a> {
    pub fn new(
        ctx: &'a ProjectContext,
        shell: &'a Shell,
        runner: &'a mut dyn CommandRunner,
    ) -> Self {
        ActionPipeline {
            ctx,
            generator: CommandGenerator::new(ctx),
            shell,
            runner,
            run_stage: true,
            dry_run: false,
        }
    }

    /// Use a specific command generator.
    pub fn with_generator(mut self, generator: CommandGenerator<'a>) -> Self {
        self.generator = generator;
        self
    }

    /// Enable or disable the optional Run stage.
    pub fn with_run_stage(mut self, enabled: bool) -> Self {
        self.run_stage = enabled;
        self
    }

    /// Print commands and would-be removals instead of acting.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check that `target` can be requested at all.
    pub fn check_target(&self, target: ActionStage) -> Result<(), PipelineError> {
        if target == ActionStage::Run && !self.run_stage {
            return Err(PipelineError::StageUnavailable(target));
        }
        Ok(())
    }

    /// Run every stage from Clear through `target`.
    pub fn run(
        &mut self,
        target: ActionStage,
        config: &BuildConfiguration,
    ) -> Result<PipelineResult, PipelineError> {
        self.check_target(target)?;

        let mut result = PipelineResult::default();
        for stage in target.prerequisites() {
            match self.run_one(stage, config, &mut result) {
                Ok(()) => result.completed.push(stage),
                Err(error) => {
                    tracing::debug!("stage `{}` failed: {}", stage, error);
                    self.shell.error(format!("{} failed: {}", stage, error));
                    result.first_failure = Some(StageFailure { stage, error });
                    break;
                }
            }
        }

        Ok(result)
    }

    fn run_one(
        &mut self,
        stage: ActionStage,
        config: &BuildConfiguration,
        result: &mut PipelineResult,
    ) -> Result<(), StageError> {
        match stage {
            ActionStage::Clear => {
                let report = self.clear()?;
                result.clear_report = Some(report);
                Ok(())
            }
            ActionStage::Generate => {
                self.shell.status(
                    Status::Generating,
                    format!("{} project ({})", config.platform, config.build_type),
                );
                self.execute_all(stage, config, result)
            }
            ActionStage::Build => {
                self.shell.status(
                    Status::Building,
                    format!("{} project ({})", config.platform, config.build_type),
                );
                self.execute_all(stage, config, result)
            }
            ActionStage::Run => self.launch(config, result),
        }
    }

    fn clear(&self) -> Result<ClearReport, StageError> {
        let root = self.ctx.root();
        self.shell
            .status(Status::Clearing, format!("CMake cache in {}", root.display()));

        let report = CacheInvalidator::new(root)
            .dry_run(self.dry_run)
            .clear()
            .map_err(|source| StageError::Scan {
                path: root.to_path_buf(),
                source,
            })?;

        for path in report.removed_files.iter().chain(&report.removed_dirs) {
            if self.dry_run {
                self.shell.plan_line(format!("remove {}", path.display()));
            } else {
                self.shell.verbose(Status::Removed, path.display());
            }
        }
        for err in &report.errors {
            self.shell.warn(format!(
                "could not remove {}: {}",
                err.path.display(),
                err.message
            ));
        }

        if report.is_empty() {
            self.shell.status(Status::Skipped, "nothing to clear");
        } else if !self.dry_run {
            self.shell.status(
                Status::Removed,
                format!(
                    "{} files, {} directories",
                    report.removed_files.len(),
                    report.removed_dirs.len()
                ),
            );
        }

        Ok(report)
    }

    fn launch(
        &mut self,
        config: &BuildConfiguration,
        result: &mut PipelineResult,
    ) -> Result<(), StageError> {
        let executable = self.ctx.executable();
        self.shell
            .status(Status::Running, executable.display());

        if !self.dry_run {
            let status = launcher::prepare(&executable).map_err(|e| StageError::Launch {
                path: executable.clone(),
                message: format!("{:#}", e),
            })?;

            if status == LaunchStatus::Missing {
                self.shell.warn(format!(
                    "nothing to run, {} could not be launched",
                    executable.display()
                ));
                result.missing_artifact = Some(executable);
                return Ok(());
            }
        }

        self.execute_all(ActionStage::Run, config, result)
    }

    fn execute_all(
        &mut self,
        stage: ActionStage,
        config: &BuildConfiguration,
        result: &mut PipelineResult,
    ) -> Result<(), StageError> {
        for cmd in self.generator.generate(stage, config)? {
            self.execute(cmd, result)?;
        }
        Ok(())
    }

    fn execute(&mut self, cmd: ExternalCommand, result: &mut PipelineResult) -> Result<(), StageError> {
        let command = cmd.display_command();

        if self.dry_run {
            self.shell.plan_line(&command);
            result.commands.push(cmd);
            return Ok(());
        }

        tracing::debug!("running `{}` in {}", command, cmd.cwd.display());
        self.shell.verbose(Status::Info, &command);

        let outcome = self.runner.run(&cmd);
        result.commands.push(cmd);

        let code = match outcome {
            Ok(code) => code,
            Err(e) => {
                result.last_exit_code = Some(SPAWN_FAILURE_CODE);
                return Err(StageError::Spawn {
                    command,
                    message: format!("{:#}", e),
                });
            }
        };

        result.last_exit_code = Some(code);
        if code != 0 {
            return Err(StageError::CommandFailed { command, code });
        }
        Ok(())
    }
}
