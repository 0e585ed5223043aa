//! CLI definitions using clap.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use slark_build::core::{ActionStage, RawConfiguration};
use slark_build::ops::RebuildOptions;

/// Long flags historically spelled with a single dash.
const LEGACY_FLAGS: [&str; 2] = ["-disable_http", "-disable_test"];

/// slark-build - clear, generate, build and run the slark project
#[derive(Parser, Debug)]
#[command(name = "slark-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target platform: PC, iOS or Android
    #[arg(short, long, default_value = "PC", value_name = "PLATFORM")]
    pub platform: String,

    /// Build type: Debug or Release
    #[arg(short = 't', long = "type", default_value = "Debug", value_name = "TYPE")]
    pub build_type: String,

    /// Output kind: lib or exe
    #[arg(short, long, default_value = "exe", value_name = "KIND")]
    pub output: String,

    /// Component: base or core
    #[arg(short = 'n', long, default_value = "base", value_name = "NAME")]
    pub component: String,

    /// Build without the HTTP module
    #[arg(long = "disable-http", alias = "disable_http")]
    pub disable_http: bool,

    /// Build without tests
    #[arg(long = "disable-test", alias = "disable_test")]
    pub disable_test: bool,

    /// Generate the iOS demo workspace instead of the library project
    #[arg(short, long)]
    pub demo: bool,

    /// Last stage to run: clear, gen, build or run
    #[arg(short, long, default_value = "gen", value_name = "ACTION")]
    pub action: ActionStage,

    /// Extra CMake cache entry, may be repeated
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Project root (defaults to the nearest directory with CMakeLists.txt)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Android NDK root
    #[arg(long, env = "ANDROID_NDK_HOME", value_name = "DIR")]
    pub ndk: Option<PathBuf>,

    /// Refuse to launch the built executable
    #[arg(long)]
    pub no_run: bool,

    /// Print the commands and removals without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn rebuild_options(&self) -> RebuildOptions {
        let raw = RawConfiguration {
            platform: self.platform.clone(),
            build_type: self.build_type.clone(),
            output: self.output.clone(),
            component: self.component.clone(),
            disable_http: self.disable_http,
            disable_test: self.disable_test,
            demo: self.demo,
            defines: self.defines.clone(),
        };

        let mut opts = RebuildOptions::new(raw, self.action);
        opts.ndk = self.ndk.clone();
        opts.no_run = self.no_run;
        opts.dry_run = self.dry_run;
        opts
    }
}

/// Rewrite `-disable_http` style flags to their double-dash form.
///
/// Arguments after a bare `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut escaped = false;
    args.into_iter()
        .map(|arg| {
            if escaped {
                return arg;
            }
            if arg == "--" {
                escaped = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if LEGACY_FLAGS.contains(&s) => OsString::from(format!("-{}", s)),
                _ => arg,
            }
        })
        .collect()
}
