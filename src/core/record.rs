//! Persisted record of the last-used build configuration.
//!
//! The record is written after every successful argument parse so the most
//! recent configuration can be inspected. It is never read back by the CLI.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::core::configuration::BuildConfiguration;
use crate::util::fs::ensure_dir;

/// File name of the record inside the project state directory.
pub const RECORD_FILE_NAME: &str = "config.json";

/// Overwrite the record at `path` with `config`.
///
/// The new contents go to a temporary file in the same directory which is
/// then renamed over the old record, so readers never see a partial file.
/// Returns the JSON that was written.
pub fn write_record(path: &Path, config: &BuildConfiguration) -> Result<String> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut json = serde_json::to_string_pretty(config)
        .context("failed to serialize build configuration")?;
    json.push('\n');

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(json.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to write configuration record: {}", path.display()))?;

    tracing::debug!("wrote configuration record to {}", path.display());
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::{BuildType, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_write_record_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".slark").join(RECORD_FILE_NAME);

        let written = write_record(&path, &BuildConfiguration::default()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, written);
        let loaded: BuildConfiguration = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, BuildConfiguration::default());
    }

    #[test]
    fn test_write_record_overwrites_wholesale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(RECORD_FILE_NAME);
        std::fs::write(&path, "{\"stale\": true, \"padding\": \"xxxxxxxxxxxxxxxxxxxx\"}").unwrap();

        let config = BuildConfiguration {
            platform: Platform::Android,
            build_type: BuildType::Release,
            ..Default::default()
        };
        write_record(&path, &config).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert!(contents.contains("\"Android\""));
        assert!(contents.contains("\"Release\""));
    }
}
