//! Configuration file support for slark-build.
//!
//! Tool settings are read from two locations:
//! - Global: `~/.slark/config.toml` - User-wide defaults
//! - Project: `.slark/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command line flags
//! take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default native project name (Xcode project, executable).
pub const DEFAULT_PROJECT_NAME: &str = "slark";

/// Default iOS toolchain file, relative to the project root.
pub const DEFAULT_IOS_TOOLCHAIN: &str = "cmake/ios.toolchain.cmake";

/// Default iOS toolchain platform.
pub const DEFAULT_IOS_PLATFORM: &str = "OS64";

/// Default minimum iOS version.
pub const DEFAULT_IOS_DEPLOYMENT_TARGET: &str = "13.0";

/// Default Android ABI.
pub const DEFAULT_ANDROID_ABI: &str = "arm64-v8a";

/// Default minimum Android API level.
pub const DEFAULT_ANDROID_PLATFORM_LEVEL: u32 = 21;

/// slark-build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project naming
    pub project: ProjectConfig,

    /// External tool locations
    pub tools: ToolsConfig,

    /// iOS cross-compilation settings
    pub ios: IosConfig,

    /// Android cross-compilation settings
    pub android: AndroidConfig,

    /// Run stage settings
    pub launcher: LauncherConfig,

    /// Extra build defines passed to project generation
    pub defines: BTreeMap<String, String>,
}

/// Project naming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Native project name (defaults to "slark")
    pub name: Option<String>,
}

/// External tool locations. Unset tools are looked up in PATH.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub cmake: Option<PathBuf>,

    /// Passed as `CMAKE_MAKE_PROGRAM` for desktop generation when set
    pub make: Option<PathBuf>,

    pub xcodebuild: Option<PathBuf>,

    pub pod: Option<PathBuf>,

    pub open: Option<PathBuf>,
}

/// iOS settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IosConfig {
    /// CMake toolchain file, relative to the project root unless absolute
    pub toolchain_file: Option<PathBuf>,

    /// Toolchain `PLATFORM` value (e.g., OS64, SIMULATOR64)
    pub platform: Option<String>,

    /// Minimum iOS version
    pub deployment_target: Option<String>,

    /// Demo app directory, relative to the project root unless absolute
    pub demo_dir: Option<PathBuf>,
}

/// Android settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// NDK root directory
    pub ndk: Option<PathBuf>,

    pub abi: Option<String>,

    /// Minimum API level
    pub platform_level: Option<u32>,
}

/// Run stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Whether the run stage is available at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Executable path, relative to the project root unless absolute
    pub executable: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            enabled: true,
            executable: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.project.name.is_some() {
            self.project.name = other.project.name;
        }

        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }
        if other.tools.make.is_some() {
            self.tools.make = other.tools.make;
        }
        if other.tools.xcodebuild.is_some() {
            self.tools.xcodebuild = other.tools.xcodebuild;
        }
        if other.tools.pod.is_some() {
            self.tools.pod = other.tools.pod;
        }
        if other.tools.open.is_some() {
            self.tools.open = other.tools.open;
        }

        if other.ios.toolchain_file.is_some() {
            self.ios.toolchain_file = other.ios.toolchain_file;
        }
        if other.ios.platform.is_some() {
            self.ios.platform = other.ios.platform;
        }
        if other.ios.deployment_target.is_some() {
            self.ios.deployment_target = other.ios.deployment_target;
        }
        if other.ios.demo_dir.is_some() {
            self.ios.demo_dir = other.ios.demo_dir;
        }

        if other.android.ndk.is_some() {
            self.android.ndk = other.android.ndk;
        }
        if other.android.abi.is_some() {
            self.android.abi = other.android.abi;
        }
        if other.android.platform_level.is_some() {
            self.android.platform_level = other.android.platform_level;
        }

        // Disabling wins: any layer may switch the run stage off
        if !other.launcher.enabled {
            self.launcher.enabled = false;
        }
        if other.launcher.executable.is_some() {
            self.launcher.executable = other.launcher.executable;
        }

        self.defines.extend(other.defines);
    }

    pub fn project_name(&self) -> &str {
        self.project.name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME)
    }

    pub fn cmake(&self) -> &Path {
        tool_or(&self.tools.cmake, "cmake")
    }

    pub fn xcodebuild(&self) -> &Path {
        tool_or(&self.tools.xcodebuild, "xcodebuild")
    }

    pub fn pod(&self) -> &Path {
        tool_or(&self.tools.pod, "pod")
    }

    pub fn open(&self) -> &Path {
        tool_or(&self.tools.open, "open")
    }

    pub fn ios_platform(&self) -> &str {
        self.ios.platform.as_deref().unwrap_or(DEFAULT_IOS_PLATFORM)
    }

    pub fn ios_deployment_target(&self) -> &str {
        self.ios
            .deployment_target
            .as_deref()
            .unwrap_or(DEFAULT_IOS_DEPLOYMENT_TARGET)
    }

    pub fn android_abi(&self) -> &str {
        self.android.abi.as_deref().unwrap_or(DEFAULT_ANDROID_ABI)
    }

    pub fn android_platform_level(&self) -> u32 {
        self.android
            .platform_level
            .unwrap_or(DEFAULT_ANDROID_PLATFORM_LEVEL)
    }
}

fn tool_or<'a>(tool: &'a Option<PathBuf>, default: &'static str) -> &'a Path {
    tool.as_deref().unwrap_or_else(|| Path::new(default))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.slark/config.toml)
/// 2. Global config (~/.slark/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.slark).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".slark"))
}

/// Get the global config path (~/.slark/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.project_name(), "slark");
        assert_eq!(config.cmake(), Path::new("cmake"));
        assert_eq!(config.ios_platform(), "OS64");
        assert_eq!(config.android_abi(), "arm64-v8a");
        assert_eq!(config.android_platform_level(), 21);
        assert!(config.launcher.enabled);
        assert!(config.defines.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[project]
name = "player"

[tools]
cmake = "/opt/cmake/bin/cmake"

[android]
ndk = "/opt/ndk"
platform_level = 24

[launcher]
enabled = false

[defines]
SLARK_LOG = "ON"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.project_name(), "player");
        assert_eq!(config.cmake(), Path::new("/opt/cmake/bin/cmake"));
        assert_eq!(config.android.ndk, Some(PathBuf::from("/opt/ndk")));
        assert_eq!(config.android_platform_level(), 24);
        assert!(!config.launcher.enabled);
        assert_eq!(config.defines.get("SLARK_LOG").map(String::as_str), Some("ON"));
    }

    #[test]
    fn test_load_or_default_ignores_broken_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[tools\ncmake = ").unwrap();

        let config = Config::load_or_default(&config_path);
        assert!(config.tools.cmake.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.tools.cmake = Some(PathBuf::from("/usr/bin/cmake"));
        base.android.abi = Some("x86_64".to_string());
        base.defines.insert("A".to_string(), "global".to_string());

        let mut override_cfg = Config::default();
        override_cfg.tools.cmake = Some(PathBuf::from("/usr/local/bin/cmake"));
        override_cfg.defines.insert("A".to_string(), "project".to_string());

        base.merge(override_cfg);

        assert_eq!(base.cmake(), Path::new("/usr/local/bin/cmake"));
        assert_eq!(base.android_abi(), "x86_64"); // Not overridden
        assert_eq!(base.defines.get("A").map(String::as_str), Some("project"));
        assert!(base.launcher.enabled);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[ios]
platform = "SIMULATOR64"
deployment_target = "12.0"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[ios]
deployment_target = "15.0"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.ios_platform(), "SIMULATOR64");
        assert_eq!(config.ios_deployment_target(), "15.0");
    }
}
