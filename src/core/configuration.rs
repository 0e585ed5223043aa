//! Build configuration model.
//!
//! A [`BuildConfiguration`] is validated once per invocation from raw flag
//! values and then passed by reference to every component. It is the only
//! place platform behavior may be derived from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while validating raw configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {field} `{value}`, valid values: {}", allowed.join(", "))]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid define `{0}`, expected KEY=VALUE with KEY made of letters, digits or `_`")]
    InvalidDefine(String),
}

/// Target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Platform {
    /// Desktop host (macOS or Linux)
    #[default]
    #[serde(rename = "PC", alias = "base")]
    Pc,
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "Android")]
    Android,
}

impl Platform {
    const ALLOWED: &'static [&'static str] = &["PC", "iOS", "Android"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pc" | "base" => Ok(Platform::Pc),
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(ConfigError::InvalidValue {
                field: "platform",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl BuildType {
    const ALLOWED: &'static [&'static str] = &["Debug", "Release"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuildType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(ConfigError::InvalidValue {
                field: "build type",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Whether the native scripts produce a library or an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutputKind {
    #[serde(rename = "lib")]
    Library,
    #[default]
    #[serde(rename = "exe")]
    Executable,
}

impl OutputKind {
    const ALLOWED: &'static [&'static str] = &["lib", "exe"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Library => "lib",
            OutputKind::Executable => "exe",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lib" | "library" => Ok(OutputKind::Library),
            "exe" | "executable" => Ok(OutputKind::Executable),
            _ => Err(ConfigError::InvalidValue {
                field: "output",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Main component selected for the native build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    #[default]
    Base,
    Core,
}

impl Component {
    const ALLOWED: &'static [&'static str] = &["base", "core"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Base => "base",
            Component::Core => "core",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Component {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Component::Base),
            "core" => Ok(Component::Core),
            _ => Err(ConfigError::InvalidValue {
                field: "component",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Unvalidated flag values, as received from the command line.
#[derive(Debug, Clone)]
pub struct RawConfiguration {
    pub platform: String,
    pub build_type: String,
    pub output: String,
    pub component: String,
    pub disable_http: bool,
    pub disable_test: bool,
    pub demo: bool,
    /// `KEY=VALUE` entries
    pub defines: Vec<String>,
}

impl Default for RawConfiguration {
    fn default() -> Self {
        RawConfiguration {
            platform: Platform::default().as_str().to_string(),
            build_type: BuildType::default().as_str().to_string(),
            output: OutputKind::default().as_str().to_string(),
            component: Component::default().as_str().to_string(),
            disable_http: false,
            disable_test: false,
            demo: false,
            defines: Vec::new(),
        }
    }
}

/// Validated build options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub platform: Platform,
    pub build_type: BuildType,
    pub output: OutputKind,
    pub component: Component,
    pub disable_http: bool,
    pub disable_test: bool,
    /// Prepare the iOS demo workspace as well. Ignored on other platforms.
    pub demo: bool,
    /// User supplied build defines
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defines: BTreeMap<String, String>,
}

impl BuildConfiguration {
    /// Validate raw flag values.
    pub fn from_raw(raw: &RawConfiguration) -> Result<Self, ConfigError> {
        let mut defines = BTreeMap::new();
        for entry in &raw.defines {
            let (key, value) = parse_define(entry)?;
            defines.insert(key, value);
        }

        Ok(BuildConfiguration {
            platform: raw.platform.parse()?,
            build_type: raw.build_type.parse()?,
            output: raw.output.parse()?,
            component: raw.component.parse()?,
            disable_http: raw.disable_http,
            disable_test: raw.disable_test,
            demo: raw.demo,
            defines,
        })
    }

    /// Whether the iOS demo workspace should be prepared.
    pub fn wants_demo(&self) -> bool {
        self.demo && self.platform == Platform::Ios
    }

    /// Build defines forwarded to project generation.
    ///
    /// Feature flags come first, then `extra` (project config), then the
    /// user's own defines. Later entries win.
    pub fn defines(&self, extra: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut defines = BTreeMap::new();
        if self.disable_http {
            defines.insert("DISABLE_HTTP".to_string(), "ON".to_string());
        }
        if self.disable_test {
            defines.insert("DISABLE_TEST".to_string(), "ON".to_string());
        }
        defines.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        defines.extend(self.defines.iter().map(|(k, v)| (k.clone(), v.clone())));
        defines
    }
}

/// Parse a `KEY=VALUE` define. The value may be empty.
pub fn parse_define(entry: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidDefine(entry.to_string()))?;

    let valid_key =
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_key {
        return Err(ConfigError::InvalidDefine(entry.to_string()));
    }

    Ok((key.to_string(), value.to_string()))
}
