//! Implementation of a `slark-build` invocation.
//!
//! Validate the configuration, check the requested action, persist the
//! configuration record and run the pipeline. Nothing touches the
//! filesystem or spawns a process until validation has passed.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::builder::command::CommandRunner;
use crate::builder::generator::{resolve_ndk, CommandGenerator};
use crate::core::{write_record, ActionStage, BuildConfiguration, Platform, RawConfiguration};
use crate::ops::pipeline::{ActionPipeline, PipelineResult};
use crate::util::context::ProjectContext;
use crate::util::shell::{format_duration, Shell, Status};

/// Options for one invocation.
#[derive(Debug, Clone)]
pub struct RebuildOptions {
    /// Unvalidated configuration flags
    pub raw: RawConfiguration,

    /// Last stage to run
    pub action: ActionStage,

    /// Android NDK root given on the command line
    pub ndk: Option<PathBuf>,

    /// Disable the Run stage regardless of config
    pub no_run: bool,

    /// Print what would happen without doing it
    pub dry_run: bool,
}

impl RebuildOptions {
    pub fn new(raw: RawConfiguration, action: ActionStage) -> Self {
        RebuildOptions {
            raw,
            action,
            ndk: None,
            no_run: false,
            dry_run: false,
        }
    }
}

/// Run one invocation against the project in `ctx`.
pub fn rebuild(
    ctx: &ProjectContext,
    opts: &RebuildOptions,
    shell: &Shell,
    runner: &mut dyn CommandRunner,
) -> Result<PipelineResult> {
    let config = BuildConfiguration::from_raw(&opts.raw)?;
    if config.demo && config.platform != Platform::Ios {
        shell.warn(format!(
            "--demo only applies to iOS, ignoring it for {}",
            config.platform
        ));
    }

    let run_stage = !opts.no_run && ctx.config().launcher.enabled;
    let generator =
        CommandGenerator::new(ctx).with_ndk(resolve_ndk(opts.ndk.clone(), ctx.config()));
    generator.check(opts.action, &config)?;
    let mut pipeline = ActionPipeline::new(ctx, shell, runner)
        .with_generator(generator)
        .with_run_stage(run_stage)
        .dry_run(opts.dry_run);
    pipeline.check_target(opts.action)?;

    let record = ctx.record_path();
    let json = write_record(&record, &config).context("failed to persist build configuration")?;
    shell.verbose(Status::Saved, format!("configuration to {}", record.display()));
    shell.note(format!("build configuration\n{}", json.trim_end()));

    let start = Instant::now();
    let result = pipeline.run(opts.action, &config)?;

    if result.is_success() && !opts.dry_run {
        shell.status(
            Status::Finished,
            format!(
                "`{}` for {} ({}) in {}",
                opts.action,
                config.platform,
                config.build_type,
                format_duration(start.elapsed())
            ),
        );
    }

    Ok(result)
}
