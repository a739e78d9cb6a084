// SPDX-License-Identifier: MIT

//! Hidden/system-directory skipping (§4.F).

/// Well-known top-level directories to never descend into when the walk
/// root is absolute: standard Unix system paths, macOS top-level
/// directories, user-home well-knowns, and project-dependency sinks.
const SYSTEM_DIRS: &[&str] = &[
    "bin", "sbin", "lib", "etc", "var", "tmp", "dev", "proc", "sys", "boot", "srv", "System",
    "Library", "Applications", "go", "Documents", "Desktop", "Downloads", "Music", "Pictures",
    "Movies", "Public", "node_modules", "vendor", "__pycache__", "venv",
];

/// A directory named `name` found at `depth` from the walk root is skipped
/// if it's hidden (dotfile convention), or if it's one of the well-known
/// system directories and sits directly under an absolute root (§4.F).
pub fn should_skip_dir(name: &str, depth: usize, root_is_absolute: bool) -> bool {
    if name.starts_with('.') {
        return true;
    }
    root_is_absolute && depth == 0 && SYSTEM_DIRS.contains(&name)
}

#[cfg(test)]
#[path = "skip_tests.rs"]
mod tests;
