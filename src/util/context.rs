//! Project context for slark-build operations.
//!
//! Provides centralized access to the project root, the fixed build layout
//! and the merged tool configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::record::RECORD_FILE_NAME;
use crate::util::config::{global_config_path, load_config, Config};
use crate::util::fs::normalize_path;

/// File whose presence marks a native project root.
pub const PROJECT_MARKER: &str = "CMakeLists.txt";

/// Build output directory, relative to the project root.
pub const BUILD_DIR_NAME: &str = "build";

/// Per-project state directory, relative to the project root.
pub const STATE_DIR_NAME: &str = ".slark";

/// Default iOS demo app directory, relative to the project root.
pub const DEMO_DIR: &str = "demo/iOS/demo";

/// Paths and settings for one project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    root: PathBuf,
    config: Config,
}

impl ProjectContext {
    /// Discover the project from the current directory.
    ///
    /// The root is the nearest ancestor holding a `CMakeLists.txt`, or the
    /// current directory itself if there is none.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let root = find_project_root(&cwd).unwrap_or(cwd);
        Self::with_root(root)
    }

    /// Create a context for an explicit project root.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            bail!("project root is not a directory: {}", root.display());
        }
        let root = normalize_path(root);

        let project_config = root.join(STATE_DIR_NAME).join("config.toml");
        let config = load_config(global_config_path().as_deref(), &project_config);

        Ok(ProjectContext { root, config })
    }

    /// Replace the tool configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Native build output directory (`<root>/build`).
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR_NAME)
    }

    /// Project state directory (`<root>/.slark`).
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR_NAME)
    }

    /// Location of the persisted configuration record.
    pub fn record_path(&self) -> PathBuf {
        self.state_dir().join(RECORD_FILE_NAME)
    }

    /// Generated Xcode project.
    pub fn xcode_project(&self) -> PathBuf {
        self.build_dir()
            .join(format!("{}.xcodeproj", self.config.project_name()))
    }

    /// iOS demo app directory.
    pub fn demo_dir(&self) -> PathBuf {
        self.resolve(self.config.ios.demo_dir.as_deref(), DEMO_DIR)
    }

    /// iOS cross-compilation toolchain file.
    pub fn ios_toolchain_file(&self) -> PathBuf {
        self.resolve(
            self.config.ios.toolchain_file.as_deref(),
            crate::util::config::DEFAULT_IOS_TOOLCHAIN,
        )
    }

    /// Executable launched by the run stage.
    pub fn executable(&self) -> PathBuf {
        let default = Path::new("bin").join(self.config.project_name());
        match self.config.launcher.executable.as_deref() {
            Some(path) => self.root.join(path),
            None => self.root.join(default),
        }
    }

    fn resolve(&self, configured: Option<&Path>, default: &str) -> PathBuf {
        // `join` keeps absolute paths as they are
        self.root.join(configured.unwrap_or_else(|| Path::new(default)))
    }
}

/// Find the nearest directory at or above `start` that holds a `CMakeLists.txt`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("script").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(PROJECT_MARKER), "").unwrap();

        assert_eq!(find_project_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_layout() {
        let tmp = TempDir::new().unwrap();
        let ctx = ProjectContext::with_root(tmp.path())
            .unwrap()
            .with_config(Config::default());
        let root = ctx.root().to_path_buf();

        assert_eq!(ctx.build_dir(), root.join("build"));
        assert_eq!(ctx.record_path(), root.join(".slark").join("config.json"));
        assert_eq!(ctx.xcode_project(), root.join("build").join("slark.xcodeproj"));
        assert_eq!(ctx.demo_dir(), root.join("demo/iOS/demo"));
        assert_eq!(ctx.executable(), root.join("bin").join("slark"));
    }

    #[test]
    fn test_configured_paths() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.project.name = Some("player".to_string());
        config.launcher.executable = Some(PathBuf::from("/opt/player/run"));

        let ctx = ProjectContext::with_root(tmp.path())
            .unwrap()
            .with_config(config);

        assert_eq!(ctx.executable(), PathBuf::from("/opt/player/run"));
        assert!(ctx.xcode_project().ends_with("build/player.xcodeproj"));
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(ProjectContext::with_root(tmp.path().join("missing")).is_err());
    }
}
