//! Stale CMake artifact removal.
//!
//! Artifacts are classified by substring match on their file or directory
//! name only, so versioned names like `libslark.a.1` or `CMakeCache.txt.bak`
//! match too.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Substrings marking a stale file.
pub const FILE_DENYLIST: [&str; 5] = ["CMakeCache", "cmake_install", ".a", "Makefile", ".dylib"];

/// Substrings marking a stale directory. Matching directories are removed
/// with their whole subtree.
pub const DIR_DENYLIST: [&str; 2] = ["CMakeFiles", "_deps"];

/// Whether a file with this name should be removed.
pub fn is_stale_file(name: &str) -> bool {
    FILE_DENYLIST.iter().any(|pat| name.contains(pat))
}

/// Whether a directory with this name should be removed.
pub fn is_stale_dir(name: &str) -> bool {
    DIR_DENYLIST.iter().any(|pat| name.contains(pat))
}

/// A path that could not be removed or scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearError {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one cache invalidation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub errors: Vec<ClearError>,
}

impl ClearReport {
    /// True when nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.removed_files.is_empty() && self.removed_dirs.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Walks a project tree and removes CMake-generated artifacts.
#[derive(Debug, Clone)]
pub struct CacheInvalidator {
    root: PathBuf,
    dry_run: bool,
}

impl CacheInvalidator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CacheInvalidator {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Only report what would be removed.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Remove every stale artifact below the root.
    ///
    /// Failures on individual paths are collected in the report and do not
    /// stop the walk. Only an unusable root is an error.
    pub fn clear(&self) -> io::Result<ClearReport> {
        let meta = fs::metadata(&self.root)?;
        if !meta.is_dir() {
            return Err(io::Error::other(format!(
                "not a directory: {}",
                self.root.display()
            )));
        }

        let mut report = ClearReport::default();
        let mut walker = WalkDir::new(&self.root).min_depth(1).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    tracing::debug!("cannot scan {}: {}", path.display(), err);
                    report.errors.push(ClearError {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if is_stale_dir(&name) {
                    // Never descend into a directory that is about to go
                    walker.skip_current_dir();
                    self.remove(entry.path(), true, &mut report);
                }
            } else if file_type.is_symlink() {
                // Links are removed themselves, never their targets
                if is_stale_file(&name) || is_stale_dir(&name) {
                    self.remove(entry.path(), false, &mut report);
                }
            } else if file_type.is_file() && is_stale_file(&name) {
                self.remove(entry.path(), false, &mut report);
            }
        }

        Ok(report)
    }

    fn remove(&self, path: &Path, is_dir: bool, report: &mut ClearReport) {
        let result = if self.dry_run {
            Ok(())
        } else if is_dir {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => {
                tracing::debug!("removed {}", path.display());
                if is_dir {
                    report.removed_dirs.push(path.to_path_buf());
                } else {
                    report.removed_files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                tracing::debug!("failed to remove {}: {}", path.display(), err);
                report.errors.push(ClearError {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
        }
    }
}
