// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use hangar_core::{Definition, RuntimeSpec};

use super::*;

fn plugin_action(id: &str) -> Action {
    let def = Definition {
        version: "1".to_string(),
        title: None,
        description: None,
        aliases: vec![],
        arguments: vec![],
        options: vec![],
        runtime: RuntimeSpec::Plugin,
        working_directory: None,
    };
    Action::new(id, PathBuf::from("/x"), PathBuf::from("/x/action.yaml"), def)
}

#[test]
fn register_starts_in_created_status() {
    let table = RunTable::new();
    let info = table.register(1_000, "aaaa", plugin_action("hello"));
    assert_eq!(info.status, RunStatus::Created);
    assert_eq!(table.get(&info.id).unwrap().status, RunStatus::Created);
}

#[test]
fn set_status_transitions_a_registered_run() {
    let table = RunTable::new();
    let info = table.register(1_000, "aaaa", plugin_action("hello"));
    table.set_status(&info.id, RunStatus::Running);
    assert_eq!(table.get(&info.id).unwrap().status, RunStatus::Running);
    table.set_status(&info.id, RunStatus::Finished);
    assert_eq!(table.get(&info.id).unwrap().status, RunStatus::Finished);
}

#[test]
fn set_status_on_an_unknown_id_is_a_no_op() {
    let table = RunTable::new();
    table.set_status("missing", RunStatus::Error);
    assert!(table.get("missing").is_none());
}

#[test]
fn all_returns_every_registered_run() {
    let table = RunTable::new();
    table.register(1_000, "aaaa", plugin_action("a"));
    table.register(1_001, "bbbb", plugin_action("b"));
    assert_eq!(table.all().len(), 2);
}
