// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn derives_id_with_prefix() {
    assert_eq!(derive_id("svc/actions/build").unwrap(), "svc:build");
}

#[test]
fn derives_nested_prefix() {
    assert_eq!(derive_id("a/b/actions/x").unwrap(), "a.b:x");
}

#[test]
fn derives_id_without_prefix() {
    assert_eq!(derive_id("actions/hello").unwrap(), "hello");
}

#[test]
fn rejects_empty_prefix() {
    let err = derive_id("actions").unwrap_err();
    assert!(matches!(err, IdError::EmptyPrefix(_)));
}

#[test]
fn rejects_root_actions_dir_alone() {
    // `actions/` alone has no action-name component after the marker.
    assert!(derive_id("actions/").is_err());
}
