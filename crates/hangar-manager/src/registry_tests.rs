// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use hangar_core::{Definition, RuntimeSpec};

use super::*;

fn plugin_action(id: &str, aliases: Vec<&str>) -> Action {
    let def = Definition {
        version: "1".to_string(),
        title: None,
        description: None,
        aliases: aliases.into_iter().map(str::to_string).collect(),
        arguments: vec![],
        options: vec![],
        runtime: RuntimeSpec::Plugin,
        working_directory: None,
    };
    Action::new(id, PathBuf::from("/actions/x"), PathBuf::from("/actions/x/action.yaml"), def)
}

#[test]
fn add_then_get_ref_by_canonical_id() {
    let registry = Registry::new();
    registry.add(plugin_action("hello", vec![]));
    assert!(registry.get_ref("hello").is_some());
    assert!(registry.get_ref("missing").is_none());
}

#[test]
fn add_is_last_write_wins_for_the_same_id() {
    let registry = Registry::new();
    registry.add(plugin_action("hello", vec![]));
    registry.add(plugin_action("hello", vec!["hi"]));
    assert_eq!(registry.len(), 1);
    assert!(registry.get_ref("hi").is_some());
}

#[test]
fn get_ref_resolves_through_an_alias() {
    let registry = Registry::new();
    registry.add(plugin_action("hello", vec!["hi", "greet"]));
    assert_eq!(registry.get_ref("hi").unwrap().id, "hello");
    assert_eq!(registry.get_ref("greet").unwrap().id, "hello");
}

#[test]
fn all_ref_returns_every_stored_action() {
    let registry = Registry::new();
    registry.add(plugin_action("a", vec![]));
    registry.add(plugin_action("b", vec![]));
    let mut ids: Vec<String> = registry.all_ref().iter().map(|a| a.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}
