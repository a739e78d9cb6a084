// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn skips_hidden_dirs_at_any_depth() {
    assert!(should_skip_dir(".git", 0, true));
    assert!(should_skip_dir(".cache", 3, false));
}

#[test]
fn skips_system_dirs_only_at_root_depth_when_absolute() {
    assert!(should_skip_dir("node_modules", 0, true));
    assert!(!should_skip_dir("node_modules", 1, true));
    assert!(!should_skip_dir("node_modules", 0, false));
}

#[test]
fn does_not_skip_ordinary_directories() {
    assert!(!should_skip_dir("actions", 0, true));
    assert!(!should_skip_dir("src", 2, true));
}
