//! Filesystem and shell fixtures.

use std::fs;
use std::path::Path;

use crate::util::shell::{ColorChoice, Shell, Verbosity};

/// A shell that only prints errors.
pub fn quiet_shell() -> Shell {
    Shell::new(Verbosity::Quiet, ColorChoice::Never)
}

/// Lay out a project tree after an in-source and an out-of-source CMake run.
///
/// ```text
/// CMakeLists.txt            kept
/// CMakeCache.txt            stale
/// Makefile                  stale
/// src/main.cpp              kept
/// build/libslark.a          stale
/// build/cmake_install.cmake stale
/// build/CMakeFiles/...      stale dir
/// build/_deps/...           stale dir
/// ```
pub fn create_cmake_tree(root: &Path) {
    write(root, "CMakeLists.txt", "cmake_minimum_required(VERSION 3.16)\n");
    write(root, "CMakeCache.txt", "CMAKE_BUILD_TYPE:STRING=Debug\n");
    write(root, "Makefile", "all:\n");
    write(root, "src/main.cpp", "int main() { return 0; }\n");
    write(root, "build/libslark.a", "!<arch>\n");
    write(root, "build/cmake_install.cmake", "");
    write(root, "build/CMakeFiles/Makefile.cmake", "");
    write(root, "build/CMakeFiles/3.28.1/CMakeSystem.cmake", "");
    write(root, "build/_deps/fmt-src/README.md", "");
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
