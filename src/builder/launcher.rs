//! Prepares the built executable for the run stage.

use std::path::Path;

use anyhow::Result;

use crate::util::fs::make_executable;

/// Whether there is something to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    /// The executable exists and is marked executable.
    Ready,
    /// No executable was built. Not an error.
    Missing,
}

/// Mark `executable` runnable if it exists.
pub fn prepare(executable: &Path) -> Result<LaunchStatus> {
    if !executable.is_file() {
        tracing::debug!("no executable at {}", executable.display());
        return Ok(LaunchStatus::Missing);
    }

    make_executable(executable)?;
    Ok(LaunchStatus::Ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_executable() {
        let tmp = TempDir::new().unwrap();
        let status = prepare(&tmp.path().join("bin").join("slark")).unwrap();
        assert_eq!(status, LaunchStatus::Missing);
    }

    #[test]
    fn test_directory_is_not_an_executable() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prepare(tmp.path()).unwrap(), LaunchStatus::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_executable_is_marked() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("slark");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o600)).unwrap();

        assert_eq!(prepare(&exe).unwrap(), LaunchStatus::Ready);
        let mode = std::fs::metadata(&exe).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
