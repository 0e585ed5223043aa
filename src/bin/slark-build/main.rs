//! slark-build CLI - build orchestrator for the slark native project

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slark_build::builder::command::SystemRunner;
use slark_build::ops::rebuild;
use slark_build::util::context::ProjectContext;
use slark_build::util::shell::{ColorChoice, Shell};

mod cli;

use cli::{normalize_args, Cli};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Set up logging. Stdout is reserved for dry-run plans.
    let filter = if cli.verbose {
        EnvFilter::new("slark_build=debug")
    } else {
        EnvFilter::new("slark_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color);

    let ctx = match &cli.root {
        Some(root) => ProjectContext::with_root(root)?,
        None => ProjectContext::discover()?,
    };
    tracing::debug!("project root: {}", ctx.root().display());

    let opts = cli.rebuild_options();
    let mut runner = SystemRunner;
    let result = rebuild(&ctx, &opts, &shell, &mut runner)?;

    Ok(result.exit_code())
}
