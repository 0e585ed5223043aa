//! Maps a build configuration to native tool command lines.
//!
//! | stage    | PC                      | iOS                              | Android               |
//! |----------|-------------------------|----------------------------------|-----------------------|
//! | Generate | cmake -G "Unix Makefiles" | cmake -G Xcode + open project  | cmake -G Ninja (NDK)  |
//! | Build    | cmake --build build     | xcodebuild -project              | cmake --build build   |
//! | Run      | the built executable    | the built executable             | the built executable  |
//!
//! Clear has no external command.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::builder::command::ExternalCommand;
use crate::core::{ActionStage, BuildConfiguration, Platform};
use crate::util::config::Config;
use crate::util::context::ProjectContext;

/// CMake generator for desktop builds.
pub const PC_GENERATOR: &str = "Unix Makefiles";

/// CMake generator for iOS builds.
pub const IOS_GENERATOR: &str = "Xcode";

/// CMake generator for Android builds.
pub const ANDROID_GENERATOR: &str = "Ninja";

/// NDK toolchain file, relative to the NDK root.
pub const NDK_TOOLCHAIN_FILE: &str = "build/cmake/android.toolchain.cmake";

/// Errors producing a command list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(
        "Android NDK not found\n\
         pass --ndk, set ANDROID_NDK_HOME, or set `ndk` under [android] in .slark/config.toml"
    )]
    MissingNdk,
}

/// Pick the NDK root: explicit flag first, then config, then `ANDROID_NDK_ROOT`.
pub fn resolve_ndk(explicit: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    explicit
        .or_else(|| config.android.ndk.clone())
        .or_else(|| std::env::var_os("ANDROID_NDK_ROOT").map(PathBuf::from))
}

/// Produces the external commands for each stage.
pub struct CommandGenerator<'a> {
    ctx: &'a ProjectContext,
    ndk: Option<PathBuf>,
}

impl<'a> CommandGenerator<'a> {
    pub fn new(ctx: &'a ProjectContext) -> Self {
        CommandGenerator {
            ctx,
            ndk: ctx.config().android.ndk.clone(),
        }
    }

    /// Set the Android NDK root.
    pub fn with_ndk(mut self, ndk: Option<PathBuf>) -> Self {
        self.ndk = ndk;
        self
    }

    /// Fail early if any stage up to `target` could not produce its commands.
    pub fn check(
        &self,
        target: ActionStage,
        config: &BuildConfiguration,
    ) -> Result<(), GenerateError> {
        let needs_ndk = config.platform == Platform::Android && target >= ActionStage::Generate;
        if needs_ndk && self.ndk.is_none() {
            return Err(GenerateError::MissingNdk);
        }
        Ok(())
    }

    /// Commands for `stage`, in execution order.
    pub fn generate(
        &self,
        stage: ActionStage,
        config: &BuildConfiguration,
    ) -> Result<Vec<ExternalCommand>, GenerateError> {
        let commands = match stage {
            ActionStage::Clear => Vec::new(),
            ActionStage::Generate => match config.platform {
                Platform::Pc => vec![self.generate_pc(config)],
                Platform::Ios => self.generate_ios(config),
                Platform::Android => vec![self.generate_android(config)?],
            },
            ActionStage::Build => vec![self.build(config)],
            ActionStage::Run => vec![self.run()],
        };
        Ok(commands)
    }

    fn cmake_configure(&self, generator: &str) -> ExternalCommand {
        let root = self.ctx.root();
        ExternalCommand::new(self.ctx.config().cmake(), root)
            .arg("-S")
            .path_arg(root)
            .arg("-B")
            .path_arg(&self.ctx.build_dir())
            .arg("-G")
            .arg(generator)
    }

    fn finish_configure(
        &self,
        mut cmd: ExternalCommand,
        config: &BuildConfiguration,
    ) -> ExternalCommand {
        cmd = cmd.define("CMAKE_BUILD_TYPE", config.build_type);
        for (key, value) in config.defines(&self.ctx.config().defines) {
            cmd = cmd.define(&key, value);
        }
        cmd
    }

    fn generate_pc(&self, config: &BuildConfiguration) -> ExternalCommand {
        let mut cmd = self.cmake_configure(PC_GENERATOR);
        if let Some(make) = &self.ctx.config().tools.make {
            cmd = cmd.define("CMAKE_MAKE_PROGRAM", make.display());
        }
        self.finish_configure(cmd, config)
    }

    fn generate_ios(&self, config: &BuildConfiguration) -> Vec<ExternalCommand> {
        let tools = self.ctx.config();
        let cmd = self
            .cmake_configure(IOS_GENERATOR)
            .define("CMAKE_TOOLCHAIN_FILE", self.ctx.ios_toolchain_file().display())
            .define("PLATFORM", tools.ios_platform())
            .define("DEPLOYMENT_TARGET", tools.ios_deployment_target());
        let mut commands = vec![self.finish_configure(cmd, config)];

        if config.wants_demo() {
            let demo_dir = self.ctx.demo_dir();
            commands.push(ExternalCommand::new(tools.pod(), &demo_dir).arg("install"));
            commands.push(
                ExternalCommand::new(tools.open(), &demo_dir)
                    .arg(format!("{}.xcworkspace", demo_workspace_name(&demo_dir))),
            );
        } else {
            commands.push(
                ExternalCommand::new(tools.open(), self.ctx.root())
                    .path_arg(&self.ctx.xcode_project()),
            );
        }

        commands
    }

    fn generate_android(
        &self,
        config: &BuildConfiguration,
    ) -> Result<ExternalCommand, GenerateError> {
        let ndk = self.ndk.as_ref().ok_or(GenerateError::MissingNdk)?;
        let tools = self.ctx.config();
        let cmd = self
            .cmake_configure(ANDROID_GENERATOR)
            .define("CMAKE_TOOLCHAIN_FILE", ndk.join(NDK_TOOLCHAIN_FILE).display())
            .define("ANDROID_ABI", tools.android_abi())
            .define(
                "ANDROID_PLATFORM",
                format!("android-{}", tools.android_platform_level()),
            );
        Ok(self.finish_configure(cmd, config))
    }

    fn build(&self, config: &BuildConfiguration) -> ExternalCommand {
        let root = self.ctx.root();
        match config.platform {
            Platform::Ios => ExternalCommand::new(self.ctx.config().xcodebuild(), root)
                .arg("-project")
                .path_arg(&self.ctx.xcode_project())
                .arg("-configuration")
                .arg(config.build_type.as_str()),
            Platform::Pc | Platform::Android => ExternalCommand::new(self.ctx.config().cmake(), root)
                .arg("--build")
                .path_arg(&self.ctx.build_dir()),
        }
    }

    fn run(&self) -> ExternalCommand {
        ExternalCommand::new(self.ctx.executable(), self.ctx.root())
    }
}

/// The demo workspace is named after its directory (`demo/iOS/demo` -> `demo`).
fn demo_workspace_name(demo_dir: &Path) -> String {
    demo_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "demo".to_string())
}
